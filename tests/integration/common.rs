use harvest_api::{ClientConfig, Credentials, HarvestClient, RateLimitConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT_ID: i64 = 987654;
pub const TOKEN: &str = "integration-token";

/// Client pointed at `server` without any request quota.
pub fn client(server: &MockServer) -> HarvestClient {
    client_with_rate(server, RateLimitConfig::unlimited())
}

pub fn client_with_rate(server: &MockServer, rate_limit: RateLimitConfig) -> HarvestClient {
    HarvestClient::with_config(
        Credentials::new(ACCOUNT_ID, TOKEN),
        ClientConfig::builder()
            .with_base_url(server.uri())
            .with_rate_limit(rate_limit)
            .build(),
    )
    .expect("client builds")
}

/// Listing envelope as Harvest returns it.
pub fn envelope(field: &str, items: Value, next: Option<String>) -> Value {
    let mut body = json!({
        "per_page": 100,
        "links": {"next": next}
    });
    body[field] = items;
    body
}

/// Mount `pages` of `/path` as `?page=1..=n`, each linking to the following one.
pub async fn mount_pages(server: &MockServer, resource: &str, field: &str, pages: &[Value]) {
    for (i, items) in pages.iter().enumerate() {
        let page = i + 1;
        let next = (page < pages.len())
            .then(|| format!("{}/{resource}?page={}", server.uri(), page + 1));
        let matcher = Mock::given(method("GET")).and(path(format!("/{resource}")));
        let mock = if page == 1 {
            matcher
        } else {
            matcher.and(query_param("page", page.to_string()))
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            field,
            items.clone(),
            next,
        )))
        // Later pages are more specific than the first.
        .with_priority(if page == 1 { 10 } else { 1 })
        .mount(server)
        .await;
    }
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
