//! Domain values exchanged with the explorer.
//!
//! Contains the network-scoped [`Address`], spendable outputs
//! ([`UnspentOutput`]), address summaries ([`AddressInfo`]), the chain tip
//! answer ([`LastBlockHash`]) and the broadcast input ([`RawTransaction`]).
//! All of them validate on construction and are immutable afterwards.

use std::fmt;

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::{Amount, ScriptBuf, SignedAmount, Transaction, Txid};
use serde::{Serialize, Serializer};

use crate::error::ExplorerError;
use crate::network::Network;

/// Length of a decoded address payload: one version byte plus a 20-byte hash.
const ADDRESS_PAYLOAD_LEN: usize = 21;

// ==============================================================================
// Address
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    P2pkh,
    P2sh,
}

/// A Base58Check address known to decode under one specific network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    encoded: String,
    network: Network,
    kind: AddressKind,
}

impl Address {
    /// Decode `text` and check that its version byte belongs to `network`.
    pub fn parse(text: &str, network: Network) -> Result<Self, ExplorerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExplorerError::InvalidArgument("address is empty".to_owned()));
        }

        let payload = bitcoin::base58::decode_check(text).map_err(|e| {
            ExplorerError::InvalidArgument(format!("invalid address `{text}`: {e}"))
        })?;
        if payload.len() != ADDRESS_PAYLOAD_LEN {
            return Err(ExplorerError::InvalidArgument(format!(
                "invalid address `{text}`: payload is {} bytes, expected {ADDRESS_PAYLOAD_LEN}",
                payload.len()
            )));
        }

        let version = payload[0];
        let kind = if version == network.pubkey_prefix() {
            AddressKind::P2pkh
        } else if version == network.script_prefix() {
            AddressKind::P2sh
        } else {
            return Err(ExplorerError::InvalidArgument(format!(
                "address `{text}` is not valid on {network} (version byte {version})"
            )));
        };

        Ok(Self {
            encoded: text.to_owned(),
            network,
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

// ==============================================================================
// Unspent Output
// ==============================================================================

/// A spendable output as reported by the explorer. The client does not
/// track whether it has since been spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    pub script_pub_key: ScriptBuf,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl UnspentOutput {
    /// Build from one element of the explorer's UTXO array.
    pub fn from_insight(
        value: &serde_json::Value,
        network: Network,
    ) -> Result<Self, ExplorerError> {
        crate::translate::parse_unspent_output(value, network)
    }
}

// ==============================================================================
// Address Info
// ==============================================================================

/// Balance and activity summary of one address. Numeric fields the
/// explorer omits are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressInfo {
    pub address: Address,
    pub balance: Amount,
    pub total_received: Amount,
    pub total_sent: Amount,
    /// Mempool delta; negative while an unconfirmed spend is pending.
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub unconfirmed_balance: SignedAmount,
    pub tx_appearances: u64,
    pub unconfirmed_tx_appearances: u64,
    pub transaction_ids: Vec<Txid>,
}

// ==============================================================================
// Chain Tip
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastBlockHash {
    pub last_block_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_tip_hash: Option<String>,
}

// ==============================================================================
// Broadcast Input
// ==============================================================================

/// A transaction to broadcast, either already serialized or structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTransaction {
    Hex(String),
    Transaction(Transaction),
}

impl RawTransaction {
    /// Serialized hex sent as the `rawtx` form field.
    pub fn to_hex(&self) -> Result<String, ExplorerError> {
        match self {
            Self::Hex(hex) => {
                validate_hex(hex)?;
                Ok(hex.clone())
            }
            Self::Transaction(tx) => Ok(serialize_hex(tx)),
        }
    }
}

impl From<&str> for RawTransaction {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.trim().to_owned())
    }
}

impl From<String> for RawTransaction {
    fn from(hex: String) -> Self {
        Self::Hex(hex.trim().to_owned())
    }
}

impl From<Transaction> for RawTransaction {
    fn from(tx: Transaction) -> Self {
        Self::Transaction(tx)
    }
}

fn validate_hex(hex: &str) -> Result<(), ExplorerError> {
    if hex.is_empty() {
        return Err(ExplorerError::InvalidArgument(
            "raw transaction hex is empty".to_owned(),
        ));
    }
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ExplorerError::InvalidArgument(format!(
            "raw transaction is not hex: unexpected character `{bad}`"
        )));
    }
    if hex.len() % 2 != 0 {
        return Err(ExplorerError::InvalidArgument(format!(
            "raw transaction hex has odd length {}",
            hex.len()
        )));
    }
    Ok(())
}
