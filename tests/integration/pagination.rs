//! Listing cursors over real HTTP.

use futures::StreamExt;
use harvest_api::ListOptions;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client, envelope, mount_pages, request_count};

#[tokio::test]
async fn test_invoices_walk_all_pages_in_order() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        "invoices",
        "invoices",
        &[
            json!([{"id": 1}, {"id": 2}]),
            json!([{"id": 3}]),
            json!([{"id": 4}, {"id": 5}]),
        ],
    )
    .await;

    let client = client(&server);
    let mut cursor = client.invoices(&ListOptions::new());
    let mut ids = Vec::new();
    while let Some(invoice) = cursor.next().await {
        ids.push(invoice.unwrap().id.unwrap());
    }

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(cursor.pages_fetched(), 3);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_stopping_early_skips_remaining_pages() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        "clients",
        "clients",
        &[
            json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]),
            json!([{"id": 3, "name": "c"}]),
        ],
    )
    .await;

    let client = client(&server);
    let first: Vec<_> = client
        .customers(&ListOptions::new())
        .into_stream()
        .take(2)
        .collect()
        .await;

    assert_eq!(first.len(), 2);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_two_cursors_are_independent() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        "expenses",
        "expenses",
        &[
            json!([{"id": 1, "spent_date": "2024-01-01"}]),
            json!([{"id": 2, "spent_date": "2024-01-02"}]),
        ],
    )
    .await;

    let client = client(&server);
    let mut a = client.expenses(&ListOptions::new());
    let mut b = client.expenses(&ListOptions::new());

    assert_eq!(a.next().await.unwrap().unwrap().id, 1);
    assert_eq!(b.next().await.unwrap().unwrap().id, 1);
    assert_eq!(a.next().await.unwrap().unwrap().id, 2);
    assert!(a.next().await.is_none());
    assert_eq!(b.next().await.unwrap().unwrap().id, 2);
}

#[tokio::test]
async fn test_failure_mid_listing_ends_the_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "invoices",
            json!([{"id": 1}]),
            Some(format!("{}/broken", server.uri())),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let items: Vec<_> = client
        .invoices(&ListOptions::new())
        .into_stream()
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    let err = items[1].as_ref().unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}
