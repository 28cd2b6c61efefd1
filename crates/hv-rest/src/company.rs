//! Company (account) information.

use serde::{Deserialize, Serialize};

/// The account the credentials belong to.
///
/// `base_uri` is the account's own web host (e.g.
/// `https://acme.harvestapp.com`), which serves client-facing documents
/// such as invoice PDFs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Company {
    pub base_uri: String,
    pub full_domain: String,
    pub name: String,
    pub is_active: bool,
    pub week_start_day: String,
    pub wants_timestamp_timers: bool,
    pub time_format: String,
    pub plan_type: String,
    pub expense_feature: bool,
    pub invoice_feature: bool,
    pub estimate_feature: bool,
    pub approval_feature: bool,
    pub clock: String,
    pub decimal_symbol: String,
    pub thousands_separator: String,
    pub color_scheme: String,
}
