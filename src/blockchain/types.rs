// SPDX-License-Identifier: AGPL-3.0-or-later

//! Chain configuration and gateway data types.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};

/// Maximum number of on-chain transfers returned by a history query.
pub const HISTORY_CAP: usize = 100;

/// Static configuration for a supported EVM network.
///
/// Adding a chain means adding a constant here and wiring it into
/// [`crate::blockchain::EvmGateway::new`]; any chain id outside the
/// configured set fails closed.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// Default JSON-RPC endpoint URL
    pub rpc_url: &'static str,
    /// Etherscan-compatible indexer API URL
    pub indexer_url: &'static str,
}

/// Ethereum Sepolia testnet configuration.
pub const SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Sepolia",
    chain_id: 11155111,
    rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
    indexer_url: "https://api-sepolia.etherscan.io/api",
};

/// Base Sepolia testnet configuration.
pub const BASE_SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Base Sepolia",
    chain_id: 84532,
    rpc_url: "https://sepolia.base.org",
    indexer_url: "https://api-sepolia.basescan.org/api",
};

/// A historical transfer reported by the indexer.
///
/// Indexer data is eventually consistent with the receipt oracle; callers
/// must not assume a transfer visible here has the same view as a
/// just-polled receipt.
#[derive(Debug, Clone)]
pub struct OnchainTransfer {
    /// Sender address as reported by the indexer (lowercase hex).
    pub from: String,
    /// Recipient address (lowercase hex).
    pub to: String,
    /// Transaction hash.
    pub hash: String,
    /// Sender-side nonce of the transaction.
    pub nonce: u64,
    /// Transferred value in wei.
    pub value: U256,
    /// Block timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Receipt summary for a mined transaction.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptInfo {
    /// Block number the transaction was included in.
    pub block_number: u64,
    /// Whether the transaction succeeded.
    pub success: bool,
}

/// Result of broadcasting a transaction.
#[derive(Debug, Clone)]
pub struct SubmittedTransaction {
    /// Transaction hash (0x prefixed).
    pub transaction_hash: String,
    /// Nonce the transaction was submitted with.
    pub nonce: u64,
}
