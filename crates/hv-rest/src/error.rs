//! Error types for harvest-rest.
//!
//! Every failure of this crate originates in a request made through
//! harvest-client, so its error type is used unchanged.

pub use harvest_client::{Error, ErrorKind, Result};
