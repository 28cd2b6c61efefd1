//! List open invoices and their recipients
//!
//! This example walks every open invoice page by page, shows who each one
//! would be emailed to, and prints the account's remaining request quota.
//!
//! Run with:
//!   HARVEST_ACCOUNT_ID=... HARVEST_ACCESS_TOKEN=... RUST_LOG=harvest_client=debug \
//!     cargo run --example list_invoices

use harvest_api::rest::ListOptions;
use harvest_api::{Credentials, HarvestClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Harvest Open Invoices ===\n");

    let client = HarvestClient::new(Credentials::from_env()?)?;

    let company = client.company().await?;
    println!("Account: {} ({})\n", company.name, company.base_uri);

    let mut invoices = client.invoices(&ListOptions::new().per_page(100));
    let mut shown = 0;

    while let Some(invoice) = invoices.next().await {
        let invoice = invoice?;
        if invoice.state.as_deref() != Some("open") {
            continue;
        }
        shown += 1;

        let customer = invoice.customer.as_ref();
        println!(
            "#{} {} due {:.2} {}",
            invoice.number.as_deref().unwrap_or("-"),
            customer.map(|c| c.name.as_str()).unwrap_or("?"),
            invoice.due_amount.unwrap_or_default(),
            invoice.currency.as_deref().unwrap_or("")
        );

        if let Some(customer) = customer {
            for recipient in client.recipients(customer.id).await? {
                println!("    -> {} <{}>", recipient.name, recipient.email);
            }
        }
    }

    println!(
        "\n✓ {} open invoices across {} pages, {} requests left in the bucket",
        shown,
        invoices.pages_fetched(),
        client.inner().rate_limiter().available()
    );

    Ok(())
}
