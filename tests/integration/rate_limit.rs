//! Request quota shared between clones, tasks and request kinds.

use std::time::{Duration, Instant};

use harvest_api::{ListOptions, RateLimitConfig};
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_with_rate, envelope, request_count};

async fn mount_everything(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut body = envelope("invoices", json!([]), None);
            body["name"] = json!("Acme");
            body
        }))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_concurrent_tasks_share_one_quota() {
    let server = MockServer::start().await;
    mount_everything(&server).await;

    // Two immediately, then one every 100ms.
    let client = client_with_rate(&server, RateLimitConfig::new(2, Duration::from_millis(100)));

    let start = Instant::now();
    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    client.fetch_invoices(&ListOptions::new()).await.map(|_| ())
                } else {
                    client
                        .inner()
                        .get_json::<serde_json::Value>(&client.inner().url("users/me"))
                        .await
                        .map(|_| ())
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    let elapsed = start.elapsed();

    assert_eq!(request_count(&server).await, 6);
    assert!(
        elapsed >= Duration::from_millis(390),
        "6 requests with a burst of 2 finished in {elapsed:?}"
    );
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[tokio::test]
async fn test_company_cache_saves_tokens() {
    let server = MockServer::start().await;
    mount_everything(&server).await;

    let client = client_with_rate(&server, RateLimitConfig::new(3, Duration::from_secs(60)));

    for _ in 0..5 {
        assert_eq!(client.company().await.unwrap().name, "Acme");
    }
    assert_eq!(request_count(&server).await, 1);
    assert_eq!(client.inner().rate_limiter().available(), 2);
}
