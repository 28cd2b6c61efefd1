//! # harvest-api
//!
//! A Harvest time-tracking and invoicing API client library for Rust.
//!
//! Every request is authenticated with an account ID and a personal access
//! token, and draws from one shared token-bucket quota (100 requests per
//! 15 seconds by default) no matter how many tasks use the client.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Tracing spans skip credentials and request bodies
//!
//! ## Crates
//!
//! - **harvest-client** - Core HTTP client: rate limiting, pagination, streaming multipart uploads
//! - **harvest-rest** - REST API: company, invoices, clients, contacts, expenses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use harvest_api::{Credentials, HarvestClient, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // HARVEST_ACCOUNT_ID and HARVEST_ACCESS_TOKEN
//!     let client = HarvestClient::new(Credentials::from_env()?)?;
//!
//!     let mut invoices = client.invoices(&ListOptions::new().per_page(100));
//!     while let Some(invoice) = invoices.next().await {
//!         let invoice = invoice?;
//!         println!("{:?} {:?}", invoice.number, invoice.due_amount);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "client")]
pub use harvest_client as client;
#[cfg(feature = "rest")]
pub use harvest_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use harvest_client::{ClientConfig, Credentials, Error, HarvestHttpClient, RateLimitConfig};
#[cfg(feature = "rest")]
pub use harvest_rest::{HarvestClient, ListOptions};
