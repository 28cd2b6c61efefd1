//! Account credentials attached to every authenticated request.
//!
//! The token is redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};

/// Environment variable holding the numeric account ID.
pub const ACCOUNT_ID_ENV: &str = "HARVEST_ACCOUNT_ID";

/// Environment variable holding the personal access token.
pub const ACCESS_TOKEN_ENV: &str = "HARVEST_ACCESS_TOKEN";

/// Harvest account ID plus personal access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    account_id: i64,
    token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Create credentials from an account ID and access token.
    pub fn new(account_id: i64, token: impl Into<String>) -> Self {
        Self {
            account_id,
            token: token.into(),
        }
    }

    /// Load credentials from `HARVEST_ACCOUNT_ID` and `HARVEST_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let account_id = std::env::var(ACCOUNT_ID_ENV).map_err(|_| {
            Error::new(ErrorKind::Config(format!("{ACCOUNT_ID_ENV} is not set")))
        })?;
        let token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
            Error::new(ErrorKind::Config(format!("{ACCESS_TOKEN_ENV} is not set")))
        })?;
        Self::parse(&account_id, token)
    }

    fn parse(account_id: &str, token: String) -> Result<Self> {
        let account_id = account_id.trim().parse::<i64>().map_err(|e| {
            Error::with_source(
                ErrorKind::Config(format!("{ACCOUNT_ID_ENV} must be numeric")),
                e,
            )
        })?;
        if token.is_empty() {
            return Err(Error::new(ErrorKind::Config(format!(
                "{ACCESS_TOKEN_ENV} is empty"
            ))));
        }
        Ok(Self::new(account_id, token))
    }

    /// Get the account ID.
    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    /// Get the access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Headers identifying the account and authorizing the request.
    pub fn headers(&self) -> [(String, String); 2] {
        [
            ("Harvest-Account-ID".to_string(), self.account_id.to_string()),
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
        ]
    }
}
