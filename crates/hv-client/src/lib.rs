//! # harvest-client
//!
//! Core HTTP client infrastructure for the Harvest API.
//!
//! This crate provides the foundational HTTP client with:
//! - A shared token-bucket quota covering every outbound request
//! - Lazy, page-at-a-time listing cursors
//! - Streaming `multipart/form-data` uploads with bounded memory
//! - Account and bearer-token authentication headers
//! - Connection pooling and compression
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (harvest-rest: invoices, clients, expenses, ...)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   HarvestHttpClient                         │
//! │  - Holds credentials, config and the shared RateLimiter     │
//! │  - Typed JSON helpers, fetch_page, paginate, upload         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Transport                            │
//! │  - ReqwestTransport by default, replaceable in tests        │
//! │  - Buffered or streamed request bodies                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use harvest_client::{ClientConfig, Credentials, HarvestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), harvest_client::Error> {
//!     let client = HarvestHttpClient::new(Credentials::from_env()?, ClientConfig::default())?;
//!
//!     let mut invoices = client.paginate::<serde_json::Value>(client.url("invoices"), "invoices");
//!     while let Some(invoice) = invoices.next().await {
//!         println!("{}", invoice?["number"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod conduit;
mod config;
mod credentials;
mod error;
pub mod multipart;
mod page;
mod pagination;
mod rate_limit;
mod request;
mod response;
mod transport;
mod upload;

pub use client::HarvestHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, RateLimitConfig, UploadConfig};
pub use credentials::{Credentials, ACCESS_TOKEN_ENV, ACCOUNT_ID_ENV};
pub use error::{Error, ErrorKind, Result};
pub use multipart::{FilePart, MultipartForm};
pub use page::Page;
pub use pagination::Paginated;
pub use rate_limit::RateLimiter;
pub use request::{BodyStream, HttpRequest, RequestBody, RequestMethod};
pub use response::{HttpResponse, ResponseBody};
pub use transport::{ReqwestTransport, Transport};
pub use upload::{UploadPipeline, UploadResponse};

/// Default Harvest API v2 base URL
pub const DEFAULT_BASE_URL: &str = "https://api.harvestapp.com/v2";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("harvest-api/", env!("CARGO_PKG_VERSION"));
