use tracing::{debug, instrument};

use crate::contact::{Contact, Recipient};
use crate::error::Result;
use crate::options::ListOptions;

impl super::HarvestClient {
    /// Every contact of a customer that has an email address, ready to be
    /// passed to [`send_invoice`](Self::send_invoice).
    ///
    /// This is a filter on the `/contacts` listing, not a copy of it:
    /// contacts with no email (or an empty one) are left out, since an
    /// invoice message cannot be addressed to them.
    #[instrument(skip(self))]
    pub async fn recipients(&self, customer_id: i64) -> Result<Vec<Recipient>> {
        let contacts: Vec<Contact> = self
            .paginate("contacts", "contacts", &ListOptions::new().client_id(customer_id))
            .collect_all()
            .await?;

        let total = contacts.len();
        let recipients: Vec<Recipient> = contacts
            .into_iter()
            .filter_map(Contact::into_recipient)
            .collect();
        debug!(total, with_email = recipients.len(), "Loaded recipients");
        Ok(recipients)
    }
}
