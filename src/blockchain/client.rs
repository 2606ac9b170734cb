// SPDX-License-Identifier: AGPL-3.0-or-later

//! EVM gateway backed by Alloy HTTP providers.
//!
//! One gateway instance owns the closed set of configured chains. Every
//! operation resolves its chain first, so an unconfigured chain id fails
//! before any connection is attempted. Upstream RPC failures are
//! classified by message inspection into the error kinds the coordinator
//! distinguishes (`InsufficientFunds`, `RateLimited`); anything else is
//! surfaced unmodified.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;

use crate::config::Config;

use super::indexer;
use super::types::*;
use super::ChainGateway;

/// Request timeout for indexer calls.
const INDEXER_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors raised by chain gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    #[error("Chain ID {0} is not supported")]
    InvalidChainId(u64),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds to cover amount and fee")]
    InsufficientFunds,

    #[error("Upstream provider is rate limiting requests: {0}")]
    RateLimited(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}

/// A configured chain: validated endpoints plus indexer credentials.
pub(crate) struct Chain {
    pub(crate) network: NetworkConfig,
    pub(crate) rpc_url: url::Url,
    pub(crate) indexer_url: String,
    pub(crate) indexer_api_key: String,
}

/// Gateway over the configured EVM networks.
pub struct EvmGateway {
    chains: HashMap<u64, Chain>,
    http: reqwest::Client,
}

impl EvmGateway {
    /// Build the gateway from startup configuration.
    ///
    /// Endpoint URLs are parsed here so a misconfigured deployment fails
    /// at startup rather than on the first request.
    pub fn new(config: &Config) -> Result<Self, EvmError> {
        let mut chains = HashMap::new();

        for (network, override_url) in [
            (SEPOLIA, config.sepolia_rpc_url.as_deref()),
            (BASE_SEPOLIA, config.base_sepolia_rpc_url.as_deref()),
        ] {
            let raw = override_url.unwrap_or(network.rpc_url);
            let rpc_url = raw
                .parse()
                .map_err(|e: url::ParseError| EvmError::InvalidRpcUrl(e.to_string()))?;

            chains.insert(
                network.chain_id,
                Chain {
                    rpc_url,
                    indexer_url: network.indexer_url.to_string(),
                    indexer_api_key: config.etherscan_api_key.clone(),
                    network,
                },
            );
        }

        let http = reqwest::Client::builder()
            .timeout(INDEXER_TIMEOUT)
            .build()
            .map_err(|e| EvmError::Rpc(e.to_string()))?;

        Ok(Self { chains, http })
    }

    /// Resolve a configured chain; fails closed on unknown ids.
    fn chain(&self, chain_id: u64) -> Result<&Chain, EvmError> {
        self.chains
            .get(&chain_id)
            .ok_or(EvmError::InvalidChainId(chain_id))
    }
}

#[async_trait]
impl ChainGateway for EvmGateway {
    async fn get_balance(&self, chain_id: u64, address: &str) -> Result<String, EvmError> {
        let chain = self.chain(chain_id)?;
        let addr = Address::from_str(address)
            .map_err(|e| EvmError::InvalidAddress(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
        let balance = provider
            .get_balance(addr)
            .await
            .map_err(|e| classify_rpc_error(e.to_string()))?;

        Ok(format_amount(balance, 18))
    }

    async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: &str,
    ) -> Result<Option<ReceiptInfo>, EvmError> {
        let chain = self.chain(chain_id)?;
        let hash = B256::from_str(tx_hash)
            .map_err(|e| EvmError::InvalidAddress(format!("Invalid tx hash: {e}")))?;

        let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
        let receipt = provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| classify_rpc_error(e.to_string()))?;

        Ok(receipt.map(|r| ReceiptInfo {
            block_number: r.block_number.unwrap_or(0),
            success: r.status(),
        }))
    }

    async fn submit_transaction(
        &self,
        chain_id: u64,
        signer: PrivateKeySigner,
        to: &str,
        amount_in_eth: &str,
    ) -> Result<SubmittedTransaction, EvmError> {
        let chain = self.chain(chain_id)?;
        let to_addr = Address::from_str(to)
            .map_err(|e| EvmError::InvalidAddress(format!("Invalid to address: {e}")))?;
        let amount_wei = parse_amount(amount_in_eth, 18)?;

        let from = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(chain.rpc_url.clone());

        // Pin the nonce explicitly so it can be recorded with the local
        // transaction row; the pending-transaction guard depends on it.
        let nonce = provider
            .get_transaction_count(from)
            .await
            .map_err(|e| classify_rpc_error(e.to_string()))?;

        let tx = TransactionRequest::default()
            .with_to(to_addr)
            .with_value(amount_wei)
            .with_nonce(nonce);

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| classify_rpc_error(e.to_string()))?;

        let transaction_hash = format!("{:?}", pending.tx_hash());

        tracing::info!(
            chain = %chain.network.name,
            tx_hash = %transaction_hash,
            nonce,
            "Transaction broadcast"
        );

        Ok(SubmittedTransaction {
            transaction_hash,
            nonce,
        })
    }

    async fn get_transaction_history(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<Vec<OnchainTransfer>, EvmError> {
        let chain = self.chain(chain_id)?;
        indexer::fetch_transfers(&self.http, chain, address).await
    }
}

/// Map an upstream RPC failure onto the coordinator-visible error kinds.
///
/// Providers signal these conditions through message text (and the generic
/// -32000 JSON-RPC code), so classification is by pattern. Unrecognized
/// failures pass through unmodified as [`EvmError::Rpc`].
pub(crate) fn classify_rpc_error(message: String) -> EvmError {
    let lower = message.to_ascii_lowercase();

    if lower.contains("insufficient funds") {
        return EvmError::InsufficientFunds;
    }

    if lower.contains("429")
        || lower.contains("rate limit")
        || lower.contains("too many requests")
        || lower.contains("could not coalesce")
        || lower.contains("-32000")
    {
        return EvmError::RateLimited(message);
    }

    EvmError::Rpc(message)
}

/// Parse a human-readable amount into wei (or another decimal base).
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, EvmError> {
    let parts: Vec<&str> = amount.split('.').collect();

    if parts.len() > 2 || parts[0].is_empty() {
        return Err(EvmError::InvalidAmount(amount.to_string()));
    }

    let whole = parts[0]
        .parse::<u128>()
        .map_err(|_| EvmError::InvalidAmount(amount.to_string()))?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > decimals as usize {
            return Err(EvmError::InvalidAmount(format!(
                "Too many decimal places (max {decimals})"
            )));
        }
        // Pad with zeros to match decimals
        let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
        padded
            .parse::<u128>()
            .map_err(|_| EvmError::InvalidAmount(amount.to_string()))?
    } else {
        0u128
    };

    let multiplier = 10u128.pow(decimals as u32);
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| EvmError::InvalidAmount("Amount overflow".to_string()))?;

    Ok(U256::from(total))
}

/// Format wei (or another decimal base) as a human-readable amount.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}
