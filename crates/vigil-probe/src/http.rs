//! Shared HTTP reachability check.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tokio::time::Instant;
use url::Url;
use vigil_core::{Details, Error, Result};

use crate::TRACING_TARGET_HTTP;

/// Default timeout for a single HTTP check.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCheck {
    /// Requested URL.
    pub url: Url,
    /// `true` if the endpoint answered with a 2xx status.
    pub reachable: bool,
    /// Response status, if any response arrived.
    pub status_code: Option<u16>,
    /// Time until the response headers arrived or the request failed.
    pub latency: Duration,
    /// Transport error or non-success status, if any.
    pub error: Option<String>,
}

impl EndpointCheck {
    /// Renders the check as detail entries.
    pub fn details(&self) -> Details {
        let mut details = Details::new();
        details.insert("url".into(), json!(self.url.as_str()));
        details.insert("reachable".into(), json!(self.reachable));
        details.insert("latencyMs".into(), json!(self.latency.as_millis() as u64));

        if let Some(status_code) = self.status_code {
            details.insert("statusCode".into(), json!(status_code));
        }
        if let Some(error) = &self.error {
            details.insert("error".into(), json!(error));
        }
        details
    }

    /// Renders the check as a detail object.
    pub fn to_detail(&self) -> Value {
        Value::Object(self.details())
    }

    /// Error message suitable for `HealthStatus::errors`.
    pub fn failure(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|error| format!("{}: {}", self.url, error))
    }
}

/// Issues GET requests with a bounded timeout and classifies the result.
///
/// Cheap to clone; all probes share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    client: Client,
}

impl HttpChecker {
    /// Creates a checker whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("vigil/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("Failed to build HTTP client")
                    .with_source(e)
            })?;

        Ok(Self { client })
    }

    /// Checks one URL. Never fails; failures are described in the result.
    pub async fn check(&self, url: &Url) -> EndpointCheck {
        let started = Instant::now();
        let response = self.client.get(url.clone()).send().await;
        let latency = started.elapsed();

        let check = match response {
            Ok(response) => {
                let status = response.status();
                EndpointCheck {
                    url: url.clone(),
                    reachable: status.is_success(),
                    status_code: Some(status.as_u16()),
                    latency,
                    error: (!status.is_success()).then(|| format!("HTTP {}", status.as_u16())),
                }
            }
            Err(error) => EndpointCheck {
                url: url.clone(),
                reachable: false,
                status_code: None,
                latency,
                error: Some(describe(&error)),
            },
        };

        tracing::debug!(
            target: TRACING_TARGET_HTTP,
            url = %check.url,
            reachable = check.reachable,
            status_code = check.status_code,
            latency_ms = check.latency.as_millis() as u64,
            "Endpoint checked"
        );

        check
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_owned()
    } else if error.is_connect() {
        "Connection failed".to_owned()
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn classifies_responses() {
        let mut server = mockito::Server::new_async().await;
        let ok = server.mock("GET", "/ok").with_status(200).create_async().await;
        let broken = server
            .mock("GET", "/broken")
            .with_status(503)
            .create_async()
            .await;

        let checker = HttpChecker::new(DEFAULT_TIMEOUT).unwrap();
        let base = Url::parse(&server.url()).unwrap();

        let check = checker.check(&base.join("/ok").unwrap()).await;
        assert!(check.reachable);
        assert_eq!(check.status_code, Some(200));
        assert_eq!(check.failure(), None);

        let check = checker.check(&base.join("/broken").unwrap()).await;
        assert!(!check.reachable);
        assert_eq!(check.status_code, Some(503));
        assert_eq!(check.error.as_deref(), Some("HTTP 503"));
        assert_eq!(check.to_detail()["statusCode"], 503);

        ok.assert_async().await;
        broken.assert_async().await;
    }

    #[tokio::test]
    async fn refused_connections_are_unreachable() {
        // Bind and drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let checker = HttpChecker::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{port}/health")).unwrap();
        let check = checker.check(&url).await;

        assert!(!check.reachable);
        assert_eq!(check.status_code, None);
        assert!(check.failure().unwrap().contains("Connection failed"));
        assert!(check.to_detail().get("statusCode").is_none());
    }
}
