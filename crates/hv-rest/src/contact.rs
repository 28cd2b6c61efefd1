//! Customer contacts and invoice recipients.

use serde::{Deserialize, Serialize};

/// Someone an invoice can be emailed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Element of the `/contacts` listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Contact {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Contact {
    /// `None` for contacts without an email address, which
    /// [`recipients`](crate::HarvestClient::recipients) leaves out.
    pub fn into_recipient(self) -> Option<Recipient> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let name = format!(
            "{} {}",
            self.first_name.unwrap_or_default(),
            self.last_name.unwrap_or_default()
        );
        Some(Recipient {
            name: name.trim().to_string(),
            email,
        })
    }
}
