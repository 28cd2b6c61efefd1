use harvest_client::Paginated;
use tracing::{info, instrument};

use crate::error::Result;
use crate::expense::{CreateExpense, Expense};
use crate::options::ListOptions;

impl super::HarvestClient {
    /// Lazily iterate expenses matching `opts`.
    pub fn expenses(&self, opts: &ListOptions) -> Paginated<Expense> {
        self.paginate("expenses", "expenses", opts)
    }

    /// Fetch the first page of expenses only.
    #[instrument(skip(self))]
    pub async fn fetch_expenses(&self, opts: &ListOptions) -> Result<Vec<Expense>> {
        self.first_page("expenses", "expenses", opts).await
    }

    /// Create an expense, streaming the receipt (if any) as it is read.
    #[instrument(skip(self, expense), fields(project_id = expense.project_id))]
    pub async fn create_expense(&self, expense: CreateExpense) -> Result<Expense> {
        let url = self.client.url("expenses");
        let response = self
            .client
            .upload_multipart(&url, expense.into_form(), 201)
            .await?;
        let created: Expense = response.json()?;
        info!(expense_id = created.id, "Created expense");
        Ok(created)
    }
}
