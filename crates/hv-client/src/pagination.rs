//! Lazy cursor over a multi-page listing.
//!
//! A [`Paginated`] holds only the URL of the next page and the elements of
//! the current page that have not been handed out yet. A page is fetched
//! only when the caller pulls past the buffered elements, so stopping early
//! never costs an extra request.

use std::collections::VecDeque;

use futures::Stream;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::HarvestHttpClient;
use crate::error::{Error, Result};

/// Pull-based sequence of listing elements.
///
/// Not restartable: once it has returned `None` it keeps returning `None`.
/// Create a new cursor with the original URL to iterate again.
///
/// # Example
///
/// ```rust,ignore
/// let mut invoices = client.paginate::<Invoice>(client.url("invoices"), "invoices");
/// while let Some(invoice) = invoices.next().await {
///     let invoice = invoice?;
///     println!("{}", invoice.number);
/// }
/// ```
pub struct Paginated<T> {
    client: HarvestHttpClient,
    element_field: String,
    next_url: Option<String>,
    buffer: VecDeque<T>,
    pending_error: Option<Error>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<T> std::fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginated")
            .field("element_field", &self.element_field)
            .field("next_url", &self.next_url)
            .field("buffered", &self.buffer.len())
            .field("exhausted", &self.exhausted)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> Paginated<T> {
    /// Start a cursor at `first_url`. Nothing is fetched until the first pull.
    pub fn new(
        client: HarvestHttpClient,
        first_url: impl Into<String>,
        element_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            element_field: element_field.into(),
            next_url: Some(first_url.into()),
            buffer: VecDeque::new(),
            pending_error: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// A cursor whose only element is `error`.
    pub fn failed(client: HarvestHttpClient, error: Error) -> Self {
        Self {
            client,
            element_field: String::new(),
            next_url: None,
            buffer: VecDeque::new(),
            pending_error: Some(error),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Elements fetched but not yet returned.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true once the sequence has ended.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Next element, `Some(Err(_))` if a page fetch failed, `None` at the end.
    ///
    /// A fetch error is returned once and ends the sequence; no further
    /// pages are requested after it.
    pub async fn next(&mut self) -> Option<Result<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.exhausted {
                return None;
            }
            if let Some(err) = self.pending_error.take() {
                self.exhausted = true;
                return Some(Err(err));
            }

            let Some(url) = self.next_url.take() else {
                self.exhausted = true;
                return None;
            };

            self.pages_fetched += 1;
            match self.client.fetch_page::<T>(&url, &self.element_field).await {
                Ok(page) => {
                    debug!(
                        page = self.pages_fetched,
                        items = page.items.len(),
                        has_next = page.next.is_some(),
                        "Advanced pagination cursor"
                    );
                    self.buffer = page.items.into();
                    // An empty page that still links onwards is followed on the next loop turn.
                    self.next_url = page.next;
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
            }
        }
    }

    /// Adapt the cursor into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<T>>
    where
        T: Send + 'static,
    {
        futures::stream::unfold(self, |mut cursor| async move {
            let item = cursor.next().await?;
            Some((item, cursor))
        })
    }

    /// Drain every remaining element, stopping at the first error.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}

impl HarvestHttpClient {
    /// Lazily iterate a listing starting at `first_url`.
    pub fn paginate<T: DeserializeOwned>(
        &self,
        first_url: impl Into<String>,
        element_field: impl Into<String>,
    ) -> Paginated<T> {
        Paginated::new(self.clone(), first_url, element_field)
    }
}
