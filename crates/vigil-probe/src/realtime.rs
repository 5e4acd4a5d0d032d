//! Realtime transport probe.

use std::time::Duration;

use tokio::time::Instant;
use url::Url;
use vigil_core::{HealthStatus, Probe, TIMEOUT_ERROR};

use crate::TRACING_TARGET_PROBE;

/// Opens a WebSocket connection and closes it again.
#[derive(Debug, Clone)]
pub struct RealtimeProbe {
    url: Url,
    handshake_timeout: Duration,
}

impl RealtimeProbe {
    pub fn new(url: Url, handshake_timeout: Duration) -> Self {
        Self {
            url,
            handshake_timeout,
        }
    }
}

#[async_trait::async_trait]
impl Probe for RealtimeProbe {
    fn name(&self) -> &str {
        "websocket"
    }

    fn label(&self) -> &str {
        "WebSocket"
    }

    async fn check(&self, _deadline: Instant) -> HealthStatus {
        let handshake = tokio_tungstenite::connect_async(self.url.as_str());

        match tokio::time::timeout(self.handshake_timeout, handshake).await {
            Ok(Ok((mut stream, _response))) => {
                if let Err(error) = stream.close(None).await {
                    tracing::debug!(
                        target: TRACING_TARGET_PROBE,
                        probe = self.name(),
                        error = %error,
                        "Close handshake failed"
                    );
                }

                HealthStatus::healthy(self.name())
                    .with_detail("connected", true)
                    .with_detail("url", self.url.as_str())
            }
            Ok(Err(error)) => HealthStatus::unhealthy(self.name(), error.to_string())
                .with_detail("url", self.url.as_str()),
            Err(_) => HealthStatus::unhealthy(self.name(), TIMEOUT_ERROR)
                .with_detail("url", self.url.as_str()),
        }
    }
}
