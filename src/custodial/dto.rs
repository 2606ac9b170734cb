// SPDX-License-Identifier: AGPL-3.0-or-later

//! Response shapes returned by the custodial components.
//!
//! Field names serialize in camelCase to match the public API contract.
//! None of these types ever carry key material or ciphertext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A wallet as listed for its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub address: String,
    pub nick_name: String,
    pub public_key: String,
    pub created_at: DateTime<Utc>,
}

/// Result of creating a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWallet {
    pub address: String,
    pub nick_name: String,
    pub public_key: String,
}

/// Native balance for an address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    /// Decimal ether string.
    pub balance: String,
}

/// A message signature returned to the caller.
///
/// The signature is returned in the clear; only its stored copy is
/// encrypted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessage {
    pub address: String,
    pub message: String,
    pub signature: String,
}

/// Receipt returned after a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionReceipt {
    pub chain_id: u64,
    pub address: String,
    pub to: String,
    pub amount_in_eth: f64,
    pub transaction_hash: String,
    pub nonce: u64,
}

/// One page of signed messages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedMessages {
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub items: Vec<MessageItem>,
}

/// A single signed message in a history page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    pub address: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Transfer direction relative to the queried address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One entry of the reconciled transaction history.
///
/// `sealed = true` entries come from the on-chain indexer; `sealed =
/// false` entries are locally tracked submissions the indexer has not
/// surfaced yet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub from: String,
    pub to: String,
    pub transaction_hash: String,
    pub nonce: u64,
    pub sealed: bool,
    /// Decimal ether string.
    pub amount_in_eth: String,
    pub is_internal: bool,
    /// Counterparty wallet nickname, when the counterparty is custodial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}
