use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header;
use tracing::{debug, trace};

use crate::config::TransportSettings;
use crate::error::{ExplorerError, TransportError};

use super::{Transport, TransportResponse};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// [`Transport`] over a pooled `reqwest` client.
///
/// Timeouts come from [`TransportSettings`] and surface as
/// [`TransportError::Http`]. If `requests_per_second` is set, each outbound
/// request waits for the limiter first.
pub struct HttpTransport {
    client: reqwest::Client,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self, ExplorerError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .tcp_nodelay(true)
            .build()
            .map_err(TransportError::Http)?;

        let limiter = match settings.requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    ExplorerError::InvalidArgument(
                        "requests_per_second must be at least 1".to_owned(),
                    )
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self { client, limiter })
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    async fn execute(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<TransportResponse, TransportError> {
        self.wait_for_rate_limit().await;

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(
            http.method = method,
            http.url = url,
            %status,
            body_len = text.len(),
            "explorer response"
        );
        trace!(http.method = method, http.url = url, body = %text, "explorer response body");

        Ok(TransportResponse::from_text(status.as_u16(), &text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json");
        self.execute("GET", url, request).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<TransportResponse, TransportError> {
        let request = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .form(form);
        self.execute("POST", url, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_limit_rejected() {
        let settings = TransportSettings {
            requests_per_second: Some(0),
            ..TransportSettings::default()
        };
        let err = HttpTransport::new(&settings)
            .err()
            .expect("zero requests per second must be rejected");
        assert!(matches!(err, ExplorerError::InvalidArgument(_)));
    }

    #[test]
    fn builds_with_default_settings() {
        let transport = HttpTransport::new(&TransportSettings::default()).expect("default build");
        assert!(transport.limiter.is_none());
    }
}
