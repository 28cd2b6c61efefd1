//! # harvest-rest
//!
//! Typed client for the Harvest v2 REST API.
//!
//! ## Features
//!
//! - **Company** - Account information, fetched once and cached
//! - **Invoices** - List, create, send, mark as sent, record payments, download PDFs
//! - **Clients** - List customers
//! - **Contacts** - Resolve a customer's contacts into invoice recipients
//! - **Expenses** - List, and create with a streamed receipt upload
//!
//! Listings are lazy [`Paginated`] cursors that fetch one page at a time;
//! every request draws from the same rate-limit quota.
//!
//! ## Example
//!
//! ```rust,ignore
//! use harvest_client::Credentials;
//! use harvest_rest::{HarvestClient, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), harvest_rest::Error> {
//!     let client = HarvestClient::new(Credentials::from_env()?)?;
//!
//!     let company = client.company().await?;
//!     println!("{}", company.name);
//!
//!     let mut invoices = client.invoices(&ListOptions::new());
//!     while let Some(invoice) = invoices.next().await {
//!         let invoice = invoice?;
//!         if invoice.state.as_deref() == Some("draft") {
//!             client.mark_invoice_sent(invoice.id.unwrap_or_default()).await?;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod company;
mod contact;
mod customer;
mod error;
mod expense;
mod invoice;
mod options;

pub use client::HarvestClient;
pub use company::Company;
pub use contact::Recipient;
pub use customer::{Customer, Project};
pub use error::{Error, ErrorKind, Result};
pub use expense::{CreateExpense, Expense};
pub use invoice::{Invoice, LineItem};
pub use options::ListOptions;

pub use harvest_client::{FilePart, Paginated, ResponseBody};
