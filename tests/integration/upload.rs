//! Expense uploads over real sockets.

use std::time::Duration;

use chrono::NaiveDate;
use harvest_api::rest::{CreateExpense, FilePart};
use harvest_api::client::UploadConfig;
use harvest_api::{ClientConfig, Credentials, HarvestClient, RateLimitConfig};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::client;

const MIB: u64 = 1024 * 1024;

fn expense_with_receipt(bytes: u64) -> CreateExpense {
    CreateExpense::new(1, 2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 99.99)
        .with_notes("Conference ticket")
        .with_receipt(FilePart::new(
            "ticket.pdf",
            "application/pdf",
            tokio::io::repeat(b'z').take(bytes),
        ))
}

fn client_at(base_url: String) -> HarvestClient {
    HarvestClient::with_config(
        Credentials::new(1, "t"),
        ClientConfig::builder()
            .with_base_url(base_url)
            .with_rate_limit(RateLimitConfig::unlimited())
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_large_receipt_arrives_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/expenses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 31,
            "spent_date": "2024-02-29",
            "total_cost": 99.99
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let created = client
        .create_expense(expense_with_receipt(4 * MIB))
        .await
        .unwrap();
    assert_eq!(created.id, 31);

    let requests = server.received_requests().await.unwrap();
    let body = &requests[0].body;
    let receipt_bytes = body.iter().filter(|&&b| b == b'z').count() as u64;
    // The field values and headers contain no 'z'.
    assert_eq!(receipt_bytes, 4 * MIB);
    assert!(body.ends_with(b"--\r\n"));
}

/// Receipt that yields `chunks` KiB of 'z', one KiB every `pace`.
fn slow_receipt(chunks: usize, pace: Duration) -> FilePart {
    let (mut tx, rx) = tokio::io::duplex(1024);
    tokio::spawn(async move {
        for _ in 0..chunks {
            tokio::time::sleep(pace).await;
            if tx.write_all(&[b'z'; 1024]).await.is_err() {
                return;
            }
        }
    });
    FilePart::new("slow.pdf", "application/pdf", rx)
}

fn slow_client(server: &MockServer, upload_timeout: Option<Duration>) -> HarvestClient {
    HarvestClient::with_config(
        Credentials::new(1, "t"),
        ClientConfig::builder()
            .with_base_url(server.uri())
            .with_rate_limit(RateLimitConfig::unlimited())
            .with_timeout(Duration::from_secs(1))
            .with_upload(UploadConfig {
                timeout: upload_timeout,
                ..UploadConfig::default()
            })
            .build(),
    )
    .unwrap()
}

async fn accepting_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/expenses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 32,
            "spent_date": "2024-02-29"
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_slow_receipt_outlives_request_timeout() {
    let server = accepting_server().await;
    let client = slow_client(&server, None);

    let expense = CreateExpense::new(1, 2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 5.0)
        .with_receipt(slow_receipt(8, Duration::from_millis(400)));
    let created = client.create_expense(expense).await.unwrap();
    assert_eq!(created.id, 32);

    let requests = server.received_requests().await.unwrap();
    let receipt_bytes = requests[0].body.iter().filter(|&&b| b == b'z').count();
    assert_eq!(receipt_bytes, 8 * 1024);
}

#[tokio::test]
async fn test_upload_timeout_bounds_slow_receipt() {
    let server = accepting_server().await;
    let client = slow_client(&server, Some(Duration::from_millis(500)));

    let expense = CreateExpense::new(1, 2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 5.0)
        .with_receipt(slow_receipt(8, Duration::from_millis(400)));
    let err = tokio::time::timeout(Duration::from_secs(30), client.create_expense(expense))
        .await
        .expect("upload hung after its deadline")
        .unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_connection_refused_does_not_hang() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_at(format!("http://{addr}"));
    let result = tokio::time::timeout(
        Duration::from_secs(30),
        client.create_expense(expense_with_receipt(64 * MIB)),
    )
    .await
    .expect("upload hung after connection refused");

    assert!(result.unwrap_err().is_transport());
}

#[tokio::test]
async fn test_server_rejecting_early_does_not_hang() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Reads the start of the request, rejects it, and hangs up.
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 16 * 1024];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 413 Payload Too Large\r\n\
                  Content-Length: 0\r\n\
                  Connection: close\r\n\r\n",
            )
            .await;
        let _ = socket.shutdown().await;
    });

    let client = client_at(format!("http://{addr}"));
    let result = tokio::time::timeout(
        Duration::from_secs(30),
        client.create_expense(expense_with_receipt(64 * MIB)),
    )
    .await
    .expect("upload hung after the server gave up");

    let err = result.unwrap_err();
    assert!(
        err.is_transport() || err.status() == Some(413),
        "unexpected error: {err:?}"
    );
    server.await.unwrap();
}
