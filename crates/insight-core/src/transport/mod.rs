//! HTTP seam between the explorer client and the network.
//!
//! Defines the [`Transport`] trait and provides a `reqwest` implementation
//! ([`HttpTransport`]) plus a recording test mock (`mock::MockTransport`).

mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpTransport;

use async_trait::async_trait;

use crate::error::TransportError;

/// Status and parsed body of a completed HTTP exchange.
///
/// An empty body is `Null`; a body that is not JSON is kept as a JSON
/// string so explorer error text is never lost.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(text)
                .unwrap_or_else(|_| serde_json::Value::String(text.to_owned()))
        };
        Self { status, body }
    }
}

/// The two HTTP primitives the explorer client needs.
///
/// Implementations resolve to a [`TransportResponse`] whenever the server
/// answered, whatever the status, and to a [`TransportError`] only when no
/// answer arrived.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;

    /// POST `form` as `application/x-www-form-urlencoded`.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<TransportResponse, TransportError>;
}
