// SPDX-License-Identifier: AGPL-3.0-or-later

//! Historical-transfer retrieval from an Etherscan-compatible indexer.
//!
//! The indexer is a separate oracle from the JSON-RPC node: it lags the
//! chain head, so a transfer missing here can still have a receipt. The
//! coordinator's reconciliation accounts for that window.

use serde::Deserialize;
use serde_json::Value;

use super::client::{Chain, EvmError};
use super::types::{OnchainTransfer, HISTORY_CAP};

/// Etherscan API response envelope.
///
/// `result` is an array of transfers on success but a plain string for
/// errors (including throttling), hence the late decode.
#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    message: String,
    result: Value,
}

/// Raw transfer entry as returned by `module=account&action=txlist`.
#[derive(Debug, Deserialize)]
struct RawTransfer {
    from: String,
    to: String,
    hash: String,
    nonce: String,
    value: String,
    #[serde(rename = "timeStamp")]
    time_stamp: String,
}

/// Fetch transfers touching `address`, newest first, capped at
/// [`HISTORY_CAP`].
pub(crate) async fn fetch_transfers(
    http: &reqwest::Client,
    chain: &Chain,
    address: &str,
) -> Result<Vec<OnchainTransfer>, EvmError> {
    let response = http
        .get(&chain.indexer_url)
        .query(&[
            ("module", "account"),
            ("action", "txlist"),
            ("address", address),
            ("startblock", "0"),
            ("endblock", "99999999"),
            ("sort", "desc"),
            ("apikey", chain.indexer_api_key.as_str()),
        ])
        .send()
        .await
        .map_err(|e| EvmError::Rpc(format!("Indexer request failed: {e}")))?;

    if response.status().as_u16() == 429 {
        return Err(EvmError::RateLimited("Indexer returned HTTP 429".to_string()));
    }

    let body: TxListResponse = response
        .json()
        .await
        .map_err(|e| EvmError::Rpc(format!("Indexer response was invalid: {e}")))?;

    parse_tx_list(body)
}

/// Decode the indexer envelope into transfers.
fn parse_tx_list(body: TxListResponse) -> Result<Vec<OnchainTransfer>, EvmError> {
    let entries = match body.result {
        Value::Array(entries) => entries,
        Value::String(message) => {
            // "No transactions found" arrives as status 0 with an empty
            // array on most deployments, but some return it as a string.
            if message.to_ascii_lowercase().contains("rate limit") {
                return Err(EvmError::RateLimited(message));
            }
            if body.message.contains("No transactions found") {
                return Ok(Vec::new());
            }
            return Err(EvmError::Rpc(format!(
                "Indexer error: {} ({message})",
                body.message
            )));
        }
        other => {
            return Err(EvmError::Rpc(format!("Unexpected indexer result: {other}")));
        }
    };

    if body.status != "1" && !body.message.contains("No transactions found") {
        return Err(EvmError::Rpc(format!("Indexer error: {}", body.message)));
    }

    let mut transfers = Vec::with_capacity(entries.len().min(HISTORY_CAP));
    for entry in entries {
        let raw: RawTransfer = serde_json::from_value(entry)
            .map_err(|e| EvmError::Rpc(format!("Indexer transfer was malformed: {e}")))?;
        transfers.push(raw.try_into()?);
        if transfers.len() == HISTORY_CAP {
            break;
        }
    }

    Ok(transfers)
}

impl TryFrom<RawTransfer> for OnchainTransfer {
    type Error = EvmError;

    fn try_from(raw: RawTransfer) -> Result<Self, Self::Error> {
        let nonce = raw
            .nonce
            .parse::<u64>()
            .map_err(|e| EvmError::Rpc(format!("Invalid nonce in transfer: {e}")))?;
        let value = raw
            .value
            .parse()
            .map_err(|e| EvmError::Rpc(format!("Invalid value in transfer: {e}")))?;
        let seconds = raw
            .time_stamp
            .parse::<i64>()
            .map_err(|e| EvmError::Rpc(format!("Invalid timestamp in transfer: {e}")))?;
        let timestamp = chrono::DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| EvmError::Rpc(format!("Timestamp out of range: {seconds}")))?;

        Ok(OnchainTransfer {
            from: raw.from,
            to: raw.to,
            hash: raw.hash,
            nonce,
            value,
            timestamp,
        })
    }
}
