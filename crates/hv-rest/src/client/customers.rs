use harvest_client::Paginated;
use tracing::instrument;

use crate::customer::Customer;
use crate::error::Result;
use crate::options::ListOptions;

impl super::HarvestClient {
    /// Lazily iterate customers matching `opts`.
    pub fn customers(&self, opts: &ListOptions) -> Paginated<Customer> {
        self.paginate("clients", "clients", opts)
    }

    /// Fetch the first page of customers only.
    #[instrument(skip(self))]
    pub async fn fetch_customers(&self, opts: &ListOptions) -> Result<Vec<Customer>> {
        self.first_page("clients", "clients", opts).await
    }
}
