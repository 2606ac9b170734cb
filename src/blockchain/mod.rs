// SPDX-License-Identifier: AGPL-3.0-or-later

//! Chain gateway for EVM networks.
//!
//! The only component that talks to blockchain infrastructure. It covers:
//! - Native balance queries
//! - Transaction signing and broadcasting
//! - Receipt polling (the sealing oracle)
//! - Historical-transfer retrieval from an Etherscan-compatible indexer
//!
//! All operations are keyed by chain id against a closed set of configured
//! networks; an unconfigured id fails with [`EvmError::InvalidChainId`]
//! before any network call is made.

pub mod client;
pub mod indexer;
pub mod types;

use async_trait::async_trait;

use alloy::signers::local::PrivateKeySigner;

pub use client::{format_amount, parse_amount, EvmError, EvmGateway};
pub use types::*;

/// Uniform chain access consumed by the transaction coordinator.
///
/// The coordinator's pending-transaction guard and history reconciliation
/// depend only on this trait, so tests (or a stricter gateway) can be
/// substituted without touching callers.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Native balance for an address, as a decimal ether string.
    async fn get_balance(&self, chain_id: u64, address: &str) -> Result<String, EvmError>;

    /// Receipt for a transaction hash. `None` means not yet mined.
    async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: &str,
    ) -> Result<Option<ReceiptInfo>, EvmError>;

    /// Build, sign and broadcast a native-value transfer.
    async fn submit_transaction(
        &self,
        chain_id: u64,
        signer: PrivateKeySigner,
        to: &str,
        amount_in_eth: &str,
    ) -> Result<SubmittedTransaction, EvmError>;

    /// On-chain transfers touching `address`, descending by time, capped
    /// at [`types::HISTORY_CAP`] items.
    async fn get_transaction_history(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<Vec<OnchainTransfer>, EvmError>;
}
