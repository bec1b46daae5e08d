use std::sync::Arc;

use bitcoin::{BlockHash, Txid};
use tracing::{debug, warn};

use crate::config::{ExplorerConfig, TransportSettings};
use crate::error::ExplorerError;
use crate::network::Network;
use crate::transport::{HttpTransport, Transport, TransportResponse};
use crate::translate;
use crate::types::{Address, AddressInfo, LastBlockHash, RawTransaction, UnspentOutput};

const TX_PATH: &str = "/insight-api/tx/";
const UTXO_PATH: &str = "/insight-api/addrs/utxo";
const SEND_PATH: &str = "/insight-api/tx/send";
const SEND_INSTANT_PATH: &str = "/insight-api/tx/sendix";
const ADDRESS_PATH: &str = "/insight-api/addr/";
const STATUS_INFO_PATH: &str = "/insight-api/status?q=getInfo";
const BLOCK_PATH: &str = "/insight-api/block/";
const STATUS_LAST_HASH_PATH: &str = "/insight-api/status?q=getLastBlockHash";

/// Client for an Insight explorer.
///
/// Every operation validates its arguments locally, issues exactly one
/// HTTP request and translates the answer. There are no retries, no
/// caching and no shared mutable state, so one instance can serve any
/// number of concurrent callers.
#[derive(Clone)]
pub struct ExplorerClient {
    config: ExplorerConfig,
    transport: Arc<dyn Transport>,
}

impl ExplorerClient {
    /// Client over HTTP with default transport settings.
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        Self::with_settings(config, &TransportSettings::default())
    }

    pub fn with_settings(
        config: ExplorerConfig,
        settings: &TransportSettings,
    ) -> Result<Self, ExplorerError> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(config: ExplorerConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.config.network()
    }

    /// Raw transaction record for `txid` (64 hex characters).
    pub async fn get_transaction(&self, txid: &str) -> Result<serde_json::Value, ExplorerError> {
        let txid: Txid = txid.trim().parse().map_err(|e| {
            ExplorerError::InvalidArgument(format!("invalid transaction id `{txid}`: {e}"))
        })?;
        self.fetch(&format!("{TX_PATH}{txid}")).await
    }

    /// Unspent outputs of one or more addresses, fetched in a single request.
    ///
    /// An empty sequence, or any address that does not belong to this
    /// client's network, is rejected before the request is sent. For a
    /// single address see [`get_address_utxos`](Self::get_address_utxos).
    pub async fn get_utxos<I>(&self, addresses: I) -> Result<Vec<UnspentOutput>, ExplorerError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let addresses = addresses
            .into_iter()
            .map(|address| self.parse_address(address.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if addresses.is_empty() {
            return Err(ExplorerError::InvalidArgument(
                "at least one address is required".to_owned(),
            ));
        }

        let joined = addresses
            .iter()
            .map(Address::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let body = self.submit(UTXO_PATH, &[("addrs", joined)]).await?;
        translate::parse_utxos(&body, self.network())
    }

    /// Unspent outputs of one address.
    pub async fn get_address_utxos(
        &self,
        address: impl AsRef<str>,
    ) -> Result<Vec<UnspentOutput>, ExplorerError> {
        self.get_utxos(std::iter::once(address)).await
    }

    /// Broadcast a transaction. Returns the explorer-assigned txid, or
    /// `None` if the explorer accepted it without reporting one.
    pub async fn broadcast(
        &self,
        transaction: impl Into<RawTransaction>,
    ) -> Result<Option<String>, ExplorerError> {
        self.send_raw(SEND_PATH, transaction.into()).await
    }

    /// Like [`broadcast`](Self::broadcast), requesting instant-send handling.
    pub async fn broadcast_instant(
        &self,
        transaction: impl Into<RawTransaction>,
    ) -> Result<Option<String>, ExplorerError> {
        self.send_raw(SEND_INSTANT_PATH, transaction.into()).await
    }

    /// Balance and activity summary of one address.
    pub async fn address(&self, address: impl AsRef<str>) -> Result<AddressInfo, ExplorerError> {
        let address = self.parse_address(address.as_ref())?;
        let body = self.fetch(&format!("{ADDRESS_PATH}{address}")).await?;
        translate::parse_address_info(&body, self.network())
    }

    /// Hash of the last block, from the `getInfo` status query.
    pub async fn status(&self) -> Result<String, ExplorerError> {
        let body = self.fetch(STATUS_INFO_PATH).await?;
        translate::parse_status(&body)
    }

    /// Raw block payload. Only the hash format is checked locally.
    pub async fn get_block_by_hash(&self, hash: &str) -> Result<serde_json::Value, ExplorerError> {
        let hash: BlockHash = hash.trim().parse().map_err(|e| {
            ExplorerError::InvalidArgument(format!("invalid block hash `{hash}`: {e}"))
        })?;
        self.fetch(&format!("{BLOCK_PATH}{hash}")).await
    }

    pub async fn get_last_block_hash(&self) -> Result<LastBlockHash, ExplorerError> {
        let body = self.fetch(STATUS_LAST_HASH_PATH).await?;
        translate::parse_last_block_hash(&body)
    }

    fn parse_address(&self, address: &str) -> Result<Address, ExplorerError> {
        Address::parse(address, self.network())
    }

    async fn send_raw(
        &self,
        path: &str,
        transaction: RawTransaction,
    ) -> Result<Option<String>, ExplorerError> {
        let rawtx = transaction.to_hex()?;
        let body = self.submit(path, &[("rawtx", rawtx)]).await?;
        translate::parse_broadcast(&body)
    }

    async fn fetch(&self, path: &str) -> Result<serde_json::Value, ExplorerError> {
        let url = self.config.endpoint(path);
        debug!(http.method = "GET", http.path = path, "explorer request");
        let response = self.transport.get(&url).await?;
        ensure_success(path, response)
    }

    async fn submit(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<serde_json::Value, ExplorerError> {
        let url = self.config.endpoint(path);
        debug!(
            http.method = "POST",
            http.path = path,
            form.fields = form.len(),
            "explorer request"
        );
        let response = self.transport.post_form(&url, form).await?;
        ensure_success(path, response)
    }
}

/// Only a 200 counts as success. Any other status becomes `Remote`,
/// carrying the body when the explorer sent one.
fn ensure_success(
    path: &str,
    response: TransportResponse,
) -> Result<serde_json::Value, ExplorerError> {
    if response.status == 200 {
        return Ok(response.body);
    }

    warn!(http.path = path, status = response.status, "explorer rejected request");
    let body = match response.body {
        serde_json::Value::Null => None,
        body => Some(body),
    };
    Err(ExplorerError::Remote {
        status: response.status,
        body,
    })
}
