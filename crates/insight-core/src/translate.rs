//! Pure translators from explorer JSON payloads to domain values.
//!
//! Nothing here touches the network. Helpers report failures as plain
//! messages; each public translator decides which [`ExplorerError`] kind a
//! failure becomes. Malformed UTXO elements are `InvalidArgument` (the
//! element itself is rejected, as a caller-built output would be); every
//! other malformed payload is `Translation`.

use bitcoin::{Amount, Denomination, ScriptBuf, SignedAmount, Txid};
use serde_json::Value;

use crate::error::ExplorerError;
use crate::network::Network;
use crate::types::{Address, AddressInfo, LastBlockHash, UnspentOutput};

// ==============================================================================
// Unspent Outputs
// ==============================================================================

/// Translate the `addrs/utxo` response. One bad element fails the whole
/// array; partial results are never returned.
pub fn parse_utxos(body: &Value, network: Network) -> Result<Vec<UnspentOutput>, ExplorerError> {
    let items = body.as_array().ok_or_else(|| {
        ExplorerError::Translation(format!(
            "expected an array of unspent outputs, got {}",
            kind_of(body)
        ))
    })?;
    items
        .iter()
        .map(|item| parse_unspent_output(item, network))
        .collect()
}

pub fn parse_unspent_output(
    value: &Value,
    network: Network,
) -> Result<UnspentOutput, ExplorerError> {
    unspent_output(value, network)
        .map_err(|msg| ExplorerError::InvalidArgument(format!("invalid unspent output: {msg}")))
}

fn unspent_output(value: &Value, network: Network) -> Result<UnspentOutput, String> {
    if !value.is_object() {
        return Err(format!("expected a JSON object, got {}", kind_of(value)));
    }

    let txid = parse_txid(field(value, &["txid", "txId"]), "txid")?;
    let vout = parse_integer::<u32>(field(value, &["vout", "outputIndex"]), "vout")?
        .ok_or("missing vout")?;

    let script_hex = field(value, &["scriptPubKey", "script"])
        .and_then(Value::as_str)
        .ok_or("missing scriptPubKey")?;
    let script_pub_key = script_from_hex(script_hex)?;

    // Satoshis are exact; the coin-denominated amount is the fallback.
    let amount = match parse_integer::<u64>(field(value, &["satoshis"]), "satoshis")? {
        Some(sats) => Amount::from_sat(sats),
        None => parse_btc_amount(field(value, &["amount"]).ok_or("missing amount")?)?,
    };

    let address = match field(value, &["address"]).and_then(Value::as_str) {
        Some(text) => Some(Address::parse(text, network).map_err(|e| e.to_string())?),
        None => None,
    };

    Ok(UnspentOutput {
        txid,
        vout,
        script_pub_key,
        amount,
        address,
        confirmations: parse_integer(field(value, &["confirmations"]), "confirmations")?,
        height: parse_integer(field(value, &["height"]), "height")?,
    })
}

// ==============================================================================
// Address Info
// ==============================================================================

pub fn parse_address_info(body: &Value, network: Network) -> Result<AddressInfo, ExplorerError> {
    address_info(body, network).map_err(ExplorerError::Translation)
}

fn address_info(body: &Value, network: Network) -> Result<AddressInfo, String> {
    if !body.is_object() {
        return Err(format!(
            "expected an address info object, got {}",
            kind_of(body)
        ));
    }

    let addr_str = field(body, &["addrStr"])
        .and_then(Value::as_str)
        .ok_or("missing addrStr")?;
    let address = Address::parse(addr_str, network).map_err(|e| format!("addrStr: {e}"))?;

    let transaction_ids = match field(body, &["transactions"]) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| parse_txid(Some(item), "transactions[]"))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(format!(
                "transactions must be an array, got {}",
                kind_of(other)
            ))
        }
    };

    Ok(AddressInfo {
        address,
        balance: sat_or_coin(body, "balanceSat", "balance")?,
        total_received: sat_or_coin(body, "totalReceivedSat", "totalReceived")?,
        total_sent: sat_or_coin(body, "totalSentSat", "totalSent")?,
        unconfirmed_balance: signed_sat_or_coin(
            body,
            "unconfirmedBalanceSat",
            "unconfirmedBalance",
        )?,
        // Insight has always spelled these "Apperances".
        tx_appearances: parse_integer(
            field(body, &["txApperances", "txAppearances"]),
            "txApperances",
        )?
        .unwrap_or(0),
        unconfirmed_tx_appearances: parse_integer(
            field(body, &["unconfirmedTxApperances", "unconfirmedTxAppearances"]),
            "unconfirmedTxApperances",
        )?
        .unwrap_or(0),
        transaction_ids,
    })
}

fn sat_or_coin(body: &Value, sat_key: &str, coin_key: &str) -> Result<Amount, String> {
    if let Some(sats) = parse_integer::<u64>(field(body, &[sat_key]), sat_key)? {
        return Ok(Amount::from_sat(sats));
    }
    match field(body, &[coin_key]) {
        Some(value) => parse_btc_amount(value).map_err(|e| format!("{coin_key}: {e}")),
        None => Ok(Amount::ZERO),
    }
}

fn signed_sat_or_coin(
    body: &Value,
    sat_key: &str,
    coin_key: &str,
) -> Result<SignedAmount, String> {
    if let Some(sats) = parse_integer::<i64>(field(body, &[sat_key]), sat_key)? {
        return Ok(SignedAmount::from_sat(sats));
    }
    match field(body, &[coin_key]) {
        Some(Value::Number(n)) => {
            let coins = n
                .as_f64()
                .ok_or_else(|| format!("{coin_key}: invalid amount `{n}`"))?;
            SignedAmount::from_float_in(coins, Denomination::Bitcoin)
                .map_err(|e| format!("{coin_key}: invalid amount `{n}`: {e}"))
        }
        Some(other) => Err(format!("{coin_key} must be a number, got {}", kind_of(other))),
        None => Ok(SignedAmount::ZERO),
    }
}

// ==============================================================================
// Status, Chain Tip, Broadcast
// ==============================================================================

/// Extract `lastblockhash` from the `getInfo` status payload. Some explorer
/// versions nest the fields under `info`.
pub fn parse_status(body: &Value) -> Result<String, ExplorerError> {
    field(body, &["lastblockhash"])
        .or_else(|| body.get("info").and_then(|info| field(info, &["lastblockhash"])))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            ExplorerError::Translation(format!(
                "status payload has no lastblockhash string: {body}"
            ))
        })
}

pub fn parse_last_block_hash(body: &Value) -> Result<LastBlockHash, ExplorerError> {
    let last_block_hash = field(body, &["lastblockhash"])
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ExplorerError::Translation(format!(
                "last block hash payload has no lastblockhash string: {body}"
            ))
        })?;
    let sync_tip_hash = field(body, &["syncTipHash"])
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(LastBlockHash {
        last_block_hash: last_block_hash.to_owned(),
        sync_tip_hash,
    })
}

/// Extract the explorer-assigned txid from a broadcast answer. An answer
/// without one is not an error.
pub fn parse_broadcast(body: &Value) -> Result<Option<String>, ExplorerError> {
    match field(body, &["txid"]) {
        None => Ok(None),
        Some(Value::String(txid)) => Ok(Some(txid.clone())),
        Some(other) => Err(ExplorerError::Translation(format!(
            "broadcast txid must be a string, got {}",
            kind_of(other)
        ))),
    }
}

// ==============================================================================
// Field Helpers
// ==============================================================================

/// First present, non-null value among `names` (key aliases).
fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| value.get(name))
        .find(|v| !v.is_null())
}

fn parse_txid(value: Option<&Value>, field: &str) -> Result<Txid, String> {
    let value = value
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {field}"))?;
    value.parse().map_err(|e| format!("invalid {field} `{value}`: {e}"))
}

// Absent or null is `Ok(None)`; present but not an in-range integer is an error.
fn parse_integer<T>(value: Option<&Value>, field: &str) -> Result<Option<T>, String>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let Some(value) = value else {
        return Ok(None);
    };

    let converted = if let Some(n) = value.as_u64() {
        T::try_from(n).ok()
    } else if let Some(n) = value.as_i64() {
        T::try_from(n).ok()
    } else {
        return Err(format!("{field} must be an integer, got {value}"));
    };

    converted
        .map(Some)
        .ok_or_else(|| format!("{field} out of range: {value}"))
}

fn script_from_hex(hex_str: &str) -> Result<ScriptBuf, String> {
    ScriptBuf::from_hex(hex_str).map_err(|e| format!("invalid scriptPubKey hex: {e}"))
}

/// Parse a coin amount from a JSON value.
///
/// Number values are parsed via `Amount::from_float_in` to support scientific
/// notation, while string values are parsed via `Amount::from_str_in`.
/// Negative amounts are rejected.
fn parse_btc_amount(value: &Value) -> Result<Amount, String> {
    match value {
        Value::Number(n) => {
            let parsed = n
                .as_f64()
                .ok_or_else(|| format!("invalid amount `{value}`"))?;
            Amount::from_float_in(parsed, Denomination::Bitcoin)
                .map_err(|e| format!("invalid amount `{value}`: {e}"))
        }
        Value::String(s) => Amount::from_str_in(s, Denomination::Bitcoin)
            .map_err(|e| format!("invalid amount `{s}`: {e}")),
        _ => Err(format!("expected numeric amount, got: {value}")),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
