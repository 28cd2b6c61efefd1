//! Customers (Harvest "clients") and projects.

use serde::{Deserialize, Serialize};

/// A customer. Harvest's API calls these `clients`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Customer {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Project reference embedded in line items and expenses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}
