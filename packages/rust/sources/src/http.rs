//! HTTP client construction and body fetching shared by all adapters.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use hotnews_shared::{FetchConfig, HotNewsError, Result};

/// Maximum number of redirects followed per request.
const MAX_REDIRECTS: usize = 5;

/// Maximum response size we accept from a source (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Build the reqwest client shared by every source in a service.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| HotNewsError::Network(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and return the raw body, failing on non-success status.
pub(crate) async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    debug!(%url, "fetching");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HotNewsError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HotNewsError::Network(format!("{url}: HTTP {status}")));
    }

    if let Some(len) = response.content_length() {
        if len > MAX_RESPONSE_SIZE {
            return Err(HotNewsError::validation(format!(
                "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
            )));
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| HotNewsError::Network(format!("{url}: failed to read body: {e}")))?;

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_bytes_returns_body() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/page"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = build_client(&FetchConfig::default()).unwrap();
        let body = fetch_bytes(&client, &format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn fetch_bytes_rejects_error_status() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/missing"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_client(&FetchConfig::default()).unwrap();
        let err = fetch_bytes(&client, &format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, HotNewsError::Network(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn client_sends_configured_user_agent() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::header("user-agent", "hotnews-test/1.0"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let config = FetchConfig {
            user_agent: "hotnews-test/1.0".into(),
            ..FetchConfig::default()
        };
        let client = build_client(&config).unwrap();
        let body = fetch_bytes(&client, &server.uri()).await.unwrap();
        assert_eq!(body, b"ok");
    }
}
