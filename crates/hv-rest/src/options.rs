//! Listing filters.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

/// Query parameters accepted by the listing endpoints.
///
/// Unset filters are left out of the query string.
///
/// ```rust,ignore
/// let opts = ListOptions::new().client_id(5735776).per_page(100);
/// let mut invoices = client.invoices(&opts);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_since: Option<DateTime<Utc>>,
    /// Page size, 1 to 2000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only elements belonging to this customer.
    pub fn client_id(mut self, id: i64) -> Self {
        self.client_id = Some(id);
        self
    }

    pub fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.updated_since = Some(since);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Encoded query string, empty when no filter is set.
    pub fn to_query(&self) -> Result<String> {
        serde_urlencoded::to_string(self).map_err(|e| {
            Error::with_source(ErrorKind::Config(format!("invalid list options: {e}")), e)
        })
    }
}
