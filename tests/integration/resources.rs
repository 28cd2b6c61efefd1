//! Invoice workflow across company, clients, contacts and invoices.

use chrono::NaiveDate;
use harvest_api::rest::{Invoice, LineItem};
use harvest_api::ListOptions;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client, envelope, ACCOUNT_ID, TOKEN};

#[tokio::test]
async fn test_bill_a_customer_end_to_end() {
    let server = MockServer::start().await;
    let auth = format!("Bearer {TOKEN}");

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(header("Harvest-Account-ID", ACCOUNT_ID.to_string().as_str()))
        .and(header("Authorization", auth.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "clients",
            json!([{"id": 77, "name": "Globex"}]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(query_param("client_id", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "contacts",
            json!([{"first_name": "Hank", "last_name": "Scorpio", "email": "hank@globex.com"}]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoices"))
        .and(body_partial_json(json!({
            "client_id": 77,
            "line_items": [{"kind": "Service", "quantity": 3.0, "unit_price": 150.0}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5001,
            "client_id": 77,
            "client_key": "k5001",
            "state": "draft",
            "amount": 450.0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoices/5001/messages"))
        .and(body_partial_json(json!({
            "recipients": [{"name": "Hank Scorpio", "email": "hank@globex.com"}],
            "attach_pdf": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoices/5001/payments"))
        .and(body_partial_json(json!({"amount": 450.0, "paid_date": "2024-09-30"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base_uri": server.uri(),
            "name": "Initech"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/client/invoices/k5001.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(vec![b'%'; 10_000]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let customers = client.fetch_customers(&ListOptions::new()).await.unwrap();
    let globex = &customers[0];
    let recipients = client.recipients(globex.id).await.unwrap();
    assert_eq!(recipients.len(), 1);

    let invoice = client
        .create_invoice(&Invoice {
            client_id: Some(globex.id),
            line_items: vec![LineItem {
                kind: Some("Service".into()),
                quantity: Some(3.0),
                unit_price: Some(150.0),
                ..Default::default()
            }],
            ..Default::default()
        })
        .await
        .unwrap();
    let invoice_id = invoice.id.unwrap();

    client
        .send_invoice(invoice_id, "Your invoice", "See attached.", &recipients)
        .await
        .unwrap();
    client
        .add_payment(
            invoice_id,
            invoice.amount.unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            "Paid in full",
        )
        .await
        .unwrap();

    let pdf = client.download_invoice(&invoice).await.unwrap().bytes().await.unwrap();
    assert_eq!(pdf.len(), 10_000);
}

#[tokio::test]
async fn test_mark_sent_for_every_draft() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "invoices",
            json!([
                {"id": 1, "state": "draft"},
                {"id": 2, "state": "open"},
                {"id": 3, "state": "draft"}
            ]),
            None,
        )))
        .mount(&server)
        .await;
    for id in [1, 3] {
        Mock::given(method("POST"))
            .and(path(format!("/invoices/{id}/messages")))
            .and(body_partial_json(json!({"event_type": "send"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": id})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server);
    let mut invoices = client.invoices(&ListOptions::new());
    while let Some(invoice) = invoices.next().await {
        let invoice = invoice.unwrap();
        if invoice.state.as_deref() == Some("draft") {
            client.mark_invoice_sent(invoice.id.unwrap()).await.unwrap();
        }
    }
}
