//! Immutable client configuration: which explorer to talk to and which
//! network its addresses belong to.

use std::time::Duration;

use reqwest::Url;

use crate::error::ExplorerError;
use crate::network::Network;

/// Base URL and network of an explorer client. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    url: String,
    network: Network,
}

impl ExplorerConfig {
    /// Target `url` for addresses of `network`.
    pub fn new(url: &str, network: Network) -> Result<Self, ExplorerError> {
        Ok(Self {
            url: parse_base_url(url)?,
            network,
        })
    }

    /// Target the well-known explorer host of `network`.
    pub fn for_network(network: Network) -> Self {
        Self {
            url: network.default_url().to_owned(),
            network,
        }
    }

    /// Resolve a "URL or network name" target.
    ///
    /// - no target: the default network and its host
    /// - a network name (`livenet`, `testnet`, ...): that network and its host
    /// - anything else is treated as a URL, on `network` or the default one
    pub fn from_target(
        target: Option<&str>,
        network: Option<Network>,
    ) -> Result<Self, ExplorerError> {
        let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Self::for_network(network.unwrap_or_default()));
        };

        if let Some(named) = Network::from_name(target) {
            return Ok(Self::for_network(named));
        }

        Self::new(target, network.unwrap_or_default())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Join an API path (starting with `/`) onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

/// Knobs of the HTTP transport. Deadlines elapse as transport failures.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    /// Outbound request cap; `None` disables rate limiting.
    pub requests_per_second: Option<u32>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 32,
            requests_per_second: None,
        }
    }
}

fn parse_base_url(url: &str) -> Result<String, ExplorerError> {
    let url = url.trim();
    let parsed = Url::parse(url).map_err(|e| {
        ExplorerError::InvalidArgument(format!(
            "invalid explorer url `{url}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExplorerError::InvalidArgument(format!(
            "unsupported explorer url scheme `{}`; expected http or https",
            parsed.scheme()
        )));
    }
    // API paths are appended to the base, so it must end at the path.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ExplorerError::InvalidArgument(format!(
            "explorer url `{url}` must not carry a query or fragment"
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_owned())
}
