/// Every failure an explorer operation can report.
///
/// The client performs no local recovery: whichever of these occurs is
/// handed straight back to the caller, who owns any retry policy.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// Caller-supplied input failed local validation. Raised before any
    /// request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The explorer answered with a status other than 200.
    #[error("explorer returned status {status}{}", describe_body(.body))]
    Remote {
        status: u16,
        /// Parsed response body, if the explorer sent one.
        body: Option<serde_json::Value>,
    },

    /// The request never completed (connect, DNS, TLS, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 200 response whose payload could not be interpreted.
    #[error("could not translate explorer response: {0}")]
    Translation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl ExplorerError {
    /// True when the explorer was reached and rejected the request, as
    /// opposed to being unreachable.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

fn describe_body(body: &Option<serde_json::Value>) -> String {
    match body {
        None => String::new(),
        Some(serde_json::Value::String(text)) => format!(": {text}"),
        Some(other) => format!(": {other}"),
    }
}
