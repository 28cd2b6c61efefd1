use tracing::{debug, instrument};

use crate::company::Company;
use crate::error::Result;

impl super::HarvestClient {
    /// Get the account's company information.
    ///
    /// Fetched once; later calls (from any clone) return the cached value.
    /// A failed fetch is not cached.
    #[instrument(skip(self))]
    pub async fn company(&self) -> Result<&Company> {
        self.company
            .get_or_try_init(|| async {
                debug!("Loading company info");
                self.client.get_json::<Company>(&self.client.url("company")).await
            })
            .await
    }
}
