use chrono::NaiveDate;
use harvest_client::{HttpRequest, Paginated, RequestMethod, ResponseBody};
use tracing::{debug, instrument};

use crate::contact::Recipient;
use crate::error::{Error, ErrorKind, Result};
use crate::invoice::{CreatePaymentRequest, Invoice, MessageEventRequest, SendMessageRequest};
use crate::options::ListOptions;

impl super::HarvestClient {
    /// Lazily iterate invoices matching `opts`.
    pub fn invoices(&self, opts: &ListOptions) -> Paginated<Invoice> {
        self.paginate("invoices", "invoices", opts)
    }

    /// Fetch the first page of invoices only.
    #[instrument(skip(self))]
    pub async fn fetch_invoices(&self, opts: &ListOptions) -> Result<Vec<Invoice>> {
        self.first_page("invoices", "invoices", opts).await
    }

    /// Create an invoice and return it as stored.
    #[instrument(skip(self, invoice))]
    pub async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice> {
        let url = self.client.url("invoices");
        let response = self.client.post_json(&url, invoice, 201).await?;
        response.json().await
    }

    /// Email an invoice, with a copy to the sender, a link to the client
    /// page and the PDF attached.
    #[instrument(skip(self, body, recipients), fields(recipients = recipients.len()))]
    pub async fn send_invoice(
        &self,
        invoice_id: i64,
        subject: &str,
        body: &str,
        recipients: &[Recipient],
    ) -> Result<()> {
        let message = SendMessageRequest {
            recipients,
            send_me_a_copy: true,
            include_link_to_client_invoice: true,
            attach_pdf: true,
            subject,
            body,
        };
        let url = self.client.url(&format!("invoices/{invoice_id}/messages"));
        self.client.post_json(&url, &message, 201).await?;
        Ok(())
    }

    /// Mark an invoice as sent without emailing it.
    #[instrument(skip(self))]
    pub async fn mark_invoice_sent(&self, invoice_id: i64) -> Result<()> {
        let url = self.client.url(&format!("invoices/{invoice_id}/messages"));
        self.client
            .post_json(&url, &MessageEventRequest { event_type: "send" }, 201)
            .await?;
        Ok(())
    }

    /// Record a payment against an invoice.
    #[instrument(skip(self, notes))]
    pub async fn add_payment(
        &self,
        invoice_id: i64,
        amount: f64,
        paid_date: NaiveDate,
        notes: &str,
    ) -> Result<()> {
        let payment = CreatePaymentRequest {
            amount,
            paid_date,
            notes,
        };
        let url = self.client.url(&format!("invoices/{invoice_id}/payments"));
        self.client.post_json(&url, &payment, 201).await?;
        Ok(())
    }

    /// Download the invoice PDF from the account's public client page.
    ///
    /// The request carries no credentials; the invoice's `client_key` is the
    /// access token. The body is returned unread.
    #[instrument(skip(self, invoice), fields(invoice_id = ?invoice.id))]
    pub async fn download_invoice(&self, invoice: &Invoice) -> Result<ResponseBody> {
        let client_key = invoice
            .client_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::Other("invoice has no client_key".to_string())))?;

        let company = self.company().await?;
        let url = format!(
            "{}/client/invoices/{}.pdf",
            company.base_uri.trim_end_matches('/'),
            client_key
        );
        debug!(%url, "Downloading invoice PDF");

        let response = self
            .client
            .execute_expecting(HttpRequest::new(RequestMethod::Get, url), 200)
            .await?;
        Ok(response.into_body())
    }
}
