//! Expense types.

use chrono::NaiveDate;
use harvest_client::{FilePart, MultipartForm};
use serde::{Deserialize, Serialize};

use crate::customer::Project;

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: i64,
    #[serde(default)]
    pub project: Option<Project>,
    pub spent_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub is_billed: bool,
}

/// A new expense, optionally with a receipt.
///
/// The receipt is read lazily while the request is being sent, so it can be
/// arbitrarily large.
///
/// ```rust,ignore
/// let file = tokio::fs::File::open("receipt.pdf").await?;
/// let expense = CreateExpense::new(14307913, 4195926, date, 13.59)
///     .with_notes("Taxi to the airport")
///     .with_receipt(FilePart::new("receipt.pdf", "application/pdf", file));
/// client.create_expense(expense).await?;
/// ```
#[derive(Debug)]
pub struct CreateExpense {
    pub project_id: i64,
    pub expense_category_id: i64,
    pub spent_date: NaiveDate,
    pub total_cost: f64,
    pub notes: String,
    pub receipt: Option<FilePart>,
}

impl CreateExpense {
    pub fn new(
        project_id: i64,
        expense_category_id: i64,
        spent_date: NaiveDate,
        total_cost: f64,
    ) -> Self {
        Self {
            project_id,
            expense_category_id,
            spent_date,
            total_cost,
            notes: String::new(),
            receipt: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_receipt(mut self, receipt: FilePart) -> Self {
        self.receipt = Some(receipt);
        self
    }

    /// Form fields in the order the endpoint expects them, then the receipt.
    pub(crate) fn into_form(self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("spent_date", self.spent_date.format("%Y-%m-%d").to_string())
            .text("project_id", self.project_id.to_string())
            .text("expense_category_id", self.expense_category_id.to_string())
            .text("notes", self.notes)
            .text("total_cost", self.total_cost.to_string());

        match self.receipt {
            Some(receipt) => form.file(receipt),
            None => form,
        }
    }
}
