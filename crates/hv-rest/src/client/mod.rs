//! Harvest REST API client.
//!
//! This client wraps `HarvestHttpClient` from `harvest-client` and provides
//! typed methods for the company, invoice, client, contact and expense
//! endpoints.

use std::sync::Arc;

use harvest_client::{ClientConfig, Credentials, HarvestHttpClient, Paginated};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::company::Company;
use crate::error::Result;
use crate::options::ListOptions;

mod company;
mod contacts;
mod customers;
mod expenses;
mod invoices;

/// Harvest REST API client.
///
/// Cloning is cheap. Clones share the request quota and the cached
/// [`Company`].
///
/// # Example
///
/// ```rust,ignore
/// use harvest_rest::{HarvestClient, ListOptions};
/// use harvest_client::Credentials;
///
/// let client = HarvestClient::new(Credentials::from_env()?)?;
///
/// let mut invoices = client.invoices(&ListOptions::new().client_id(42));
/// while let Some(invoice) = invoices.next().await {
///     let invoice = invoice?;
///     println!("{:?} {:?}", invoice.number, invoice.state);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HarvestClient {
    client: HarvestHttpClient,
    company: Arc<OnceCell<Company>>,
}

impl HarvestClient {
    /// Create a client with the default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with custom HTTP configuration.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let client = HarvestHttpClient::new(credentials, config)?;
        Ok(Self::from_client(client))
    }

    /// Create a client from an existing HarvestHttpClient.
    pub fn from_client(client: HarvestHttpClient) -> Self {
        Self {
            client,
            company: Arc::new(OnceCell::new()),
        }
    }

    /// Get the underlying HarvestHttpClient.
    pub fn inner(&self) -> &HarvestHttpClient {
        &self.client
    }

    /// Absolute URL of a listing with its filters applied.
    fn listing_url(&self, path: &str, opts: &ListOptions) -> Result<String> {
        let query = opts.to_query()?;
        let url = self.client.url(path);
        Ok(if query.is_empty() {
            url
        } else {
            format!("{url}?{query}")
        })
    }

    fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        opts: &ListOptions,
    ) -> Paginated<T> {
        match self.listing_url(path, opts) {
            Ok(url) => self.client.paginate(url, field),
            Err(err) => Paginated::failed(self.client.clone(), err),
        }
    }

    async fn first_page<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        opts: &ListOptions,
    ) -> Result<Vec<T>> {
        let url = self.listing_url(path, opts)?;
        let page = self.client.fetch_page::<T>(&url, field).await?;
        Ok(page.items)
    }
}
