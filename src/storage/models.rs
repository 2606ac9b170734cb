// SPDX-License-Identifier: AGPL-3.0-or-later

//! Persisted row types.
//!
//! Secret material never appears here in the clear: wallets carry the
//! AES ciphertext and IV of their private key, message rows carry the
//! ciphertext and IV of their signature.

use chrono::{DateTime, Utc};

/// An authenticated principal, keyed by the identity provider's subject id.
///
/// Created lazily by the first wallet creation.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    /// Opaque subject id issued by the identity provider. Unique.
    pub dynamic_user_id: String,
    pub created_at: DateTime<Utc>,
}

/// A custodial wallet row. Immutable after creation.
#[derive(Debug, Clone)]
pub struct CustodialWallet {
    pub id: i64,
    pub user_id: i64,
    /// EIP-55 checksummed address; globally unique, looked up
    /// case-insensitively.
    pub address: String,
    pub nick_name: String,
    pub public_key: String,
    /// AES-256-CBC ciphertext of the private key (hex).
    pub encrypted_private_key: String,
    /// IV the private key was encrypted under (hex).
    pub encryption_iv: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a wallet row.
#[derive(Debug, Clone)]
pub struct NewWallet {
    pub address: String,
    pub nick_name: String,
    pub public_key: String,
    pub encrypted_private_key: String,
    pub encryption_iv: String,
}

/// A signed-message record. Append-only.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    pub id: i64,
    pub wallet_id: i64,
    /// The signed plaintext.
    pub message: String,
    /// AES-256-CBC ciphertext of the signature (hex).
    pub encrypted_signature: String,
    /// IV the signature was encrypted under (hex).
    pub signature_iv: String,
    pub created_at: DateTime<Utc>,
}

/// Local ledger row for a submitted transaction.
///
/// Written once at submission time and never updated; whether it has
/// sealed is derived from the chain at read time.
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    pub id: i64,
    /// Sending wallet.
    pub wallet_id: i64,
    pub chain_id: u64,
    pub to_address: String,
    pub amount_in_eth: f64,
    pub transaction_hash: String,
    pub nonce: u64,
    /// True when `to_address` is a custodial wallet of any user.
    pub is_internal: bool,
    /// Destination wallet when internal.
    pub to_wallet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a transaction row.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub wallet_id: i64,
    pub chain_id: u64,
    pub to_address: String,
    pub amount_in_eth: f64,
    pub transaction_hash: String,
    pub nonce: u64,
    pub is_internal: bool,
    pub to_wallet_id: Option<i64>,
}

/// A transaction row joined with the nicknames of the wallets it links.
#[derive(Debug, Clone)]
pub struct LinkedTransaction {
    pub record: TransactionHistory,
    /// Nickname of the sending wallet.
    pub sender_nick_name: String,
    /// Nickname of the destination wallet, when internal.
    pub recipient_nick_name: Option<String>,
}
