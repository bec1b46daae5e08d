//! Shared test helpers for `insight-core` unit tests.
//!
//! Builds deterministic txids, addresses for either network, explorer UTXO
//! payloads and a minimal transaction, so tests across modules share one
//! source of dummy data.

use bitcoin::hashes::Hash;
use bitcoin::{absolute, transaction, Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn};
use bitcoin::{TxOut, Txid, Witness};

use crate::network::Network;

/// P2PKH scriptPubKey: OP_DUP OP_HASH160 PUSH20 <hash> OP_EQUALVERIFY OP_CHECKSIG.
pub const P2PKH_SCRIPT_HEX: &str = "76a914000102030405060708090a0b0c0d0e0f1011121388ac";

// ==============================================================================
// Txid Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

/// The explorer's hex rendering of [`txid_from_byte`].
pub fn txid_hex(b: u8) -> String {
    txid_from_byte(b).to_string()
}

// ==============================================================================
// Address Helpers
// ==============================================================================

fn encode_address(version: u8, fill: u8) -> String {
    let mut payload = vec![version];
    payload.extend_from_slice(&[fill; 20]);
    bitcoin::base58::encode_check(&payload)
}

pub fn mainnet_address(fill: u8) -> String {
    encode_address(Network::Mainnet.pubkey_prefix(), fill)
}

pub fn mainnet_script_address(fill: u8) -> String {
    encode_address(Network::Mainnet.script_prefix(), fill)
}

pub fn testnet_address(fill: u8) -> String {
    encode_address(Network::Testnet.pubkey_prefix(), fill)
}

// ==============================================================================
// Payload Builders
// ==============================================================================

/// One element of an `addrs/utxo` response.
pub fn utxo_json(txid: String, vout: u32, amount: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "txid": txid,
        "vout": vout,
        "scriptPubKey": P2PKH_SCRIPT_HEX,
        "amount": amount,
    })
}

/// A one-in, one-out legacy transaction.
pub fn sample_transaction() -> Transaction {
    Transaction {
        version: transaction::Version::ONE,
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::new(txid_from_byte(7), 1),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(50_000),
            script_pubkey: ScriptBuf::from_hex(P2PKH_SCRIPT_HEX).expect("static script hex"),
        }],
    }
}
