//! Single-page fetch for listing endpoints.
//!
//! Harvest wraps every listing in an envelope:
//!
//! ```json
//! { "invoices": [ ... ], "links": { "next": "https://api.harvestapp.com/v2/invoices?page=2" } }
//! ```
//!
//! The element array sits under a resource-specific key; `links.next` is
//! absent, `null`, or empty on the last page.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::client::HarvestHttpClient;
use crate::error::{Error, ErrorKind, Result};

/// One decoded page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Elements in server order.
    pub items: Vec<T>,
    /// Absolute URL of the following page, if any.
    pub next: Option<String>,
}

impl HarvestHttpClient {
    /// Fetch one page: one token, one GET, no retry.
    ///
    /// `url` must be absolute and already carry its query string.
    /// `element_field` names the envelope key holding the element array.
    #[instrument(skip(self))]
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: &str,
        element_field: &str,
    ) -> Result<Page<T>> {
        let page_url = Url::parse(url)?;

        let response = self.execute_expecting(self.get(url), 200).await?;
        let bytes = response.bytes().await?;
        let envelope: Value = serde_json::from_slice(&bytes)?;
        let page = decode_page(envelope, element_field, &page_url)?;

        debug!(
            items = page.items.len(),
            has_next = page.next.is_some(),
            "Fetched page"
        );
        Ok(page)
    }
}

/// Split a decoded envelope into its elements and next link.
pub(crate) fn decode_page<T: DeserializeOwned>(
    envelope: Value,
    element_field: &str,
    page_url: &Url,
) -> Result<Page<T>> {
    let Value::Object(mut envelope) = envelope else {
        return Err(Error::decode("page envelope is not a JSON object"));
    };

    let items = match envelope.remove(element_field) {
        None => {
            return Err(Error::decode(format!(
                "missing field `{element_field}` in page envelope"
            )))
        }
        Some(Value::Null) => Vec::new(),
        Some(array @ Value::Array(_)) => serde_json::from_value(array).map_err(|e| {
            Error::with_source(
                ErrorKind::Decode(format!("invalid element in `{element_field}`: {e}")),
                e,
            )
        })?,
        Some(_) => {
            return Err(Error::decode(format!(
                "field `{element_field}` is not an array"
            )))
        }
    };

    let next = match envelope.get("links").and_then(|links| links.get("next")) {
        None | Some(Value::Null) => None,
        Some(Value::String(next)) if next.is_empty() => None,
        Some(Value::String(next)) => Some(page_url.join(next)?.to_string()),
        Some(_) => return Err(Error::decode("`links.next` is not a string")),
    };

    Ok(Page { items, next })
}
