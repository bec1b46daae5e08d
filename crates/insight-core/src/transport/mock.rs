use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TransportError;

use super::{Transport, TransportResponse};

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Get { url: String },
    Post { url: String, form: Vec<(String, String)> },
}

enum Canned {
    Response(TransportResponse),
    Failure(String),
}

/// A mock transport for testing. Answers from a URL-keyed table populated
/// via the builder pattern and records every request it receives.
pub struct MockTransport {
    routes: HashMap<String, Canned>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            routes: HashMap::new(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }

    fn answer(
        &self,
        url: &str,
        request: RecordedRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(request);
        match self.routes.get(url) {
            Some(Canned::Response(response)) => Ok(response.clone()),
            Some(Canned::Failure(message)) => Err(TransportError::Unavailable(message.clone())),
            None => Ok(TransportResponse::new(404, serde_json::json!("Not found"))),
        }
    }
}

pub struct MockTransportBuilder {
    routes: HashMap<String, Canned>,
}

impl MockTransportBuilder {
    pub fn with_response(mut self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes.insert(
            url.to_owned(),
            Canned::Response(TransportResponse::new(status, body)),
        );
        self
    }

    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.routes
            .insert(url.to_owned(), Canned::Failure(message.to_owned()));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.answer(url, RecordedRequest::Get { url: url.to_owned() })
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<TransportResponse, TransportError> {
        let form = form
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect();
        self.answer(
            url,
            RecordedRequest::Post {
                url: url.to_owned(),
                form,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_route_answers_not_found() {
        let transport = MockTransport::builder().build();
        let response = transport.get("http://mock/none").await.expect("mock answers");
        assert_eq!(response.status, 404);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn failure_route_is_transport_error() {
        let transport = MockTransport::builder()
            .with_failure("http://mock/down", "connection refused")
            .build();
        let err = transport
            .post_form("http://mock/down", &[("rawtx", "00".to_owned())])
            .await
            .expect_err("failure route must error");
        assert!(matches!(err, TransportError::Unavailable(_)));
        assert_eq!(
            transport.requests(),
            vec![RecordedRequest::Post {
                url: "http://mock/down".to_owned(),
                form: vec![("rawtx".to_owned(), "00".to_owned())],
            }]
        );
    }
}
