// SPDX-License-Identifier: AGPL-3.0-or-later

//! Transaction coordinator: signing, guarded submission and history
//! reconciliation.
//!
//! ## Pending-transaction guard
//!
//! At most one outstanding transaction per wallet and chain: before
//! signing, the most recent local row is checked against the receipt
//! oracle, and an unsealed predecessor fails the call with
//! `HasPendingTransaction`. The check is check-then-act over an eventually
//! consistent oracle, so a tight race can let two submissions through;
//! that is the documented contract, not a bug to lock away here.
//!
//! ## History reconciliation
//!
//! The merged history is built from two oracles with different clocks: the
//! transfer indexer (sealed entries) and the local ledger (pending
//! entries). Pending entries come first and the result is ordered by
//! recency as a best effort, not a linearizable history.

use std::sync::Arc;

use alloy::signers::Signer;

use crate::blockchain::{format_amount, ChainGateway};
use crate::storage::{Database, LinkedTransaction, NewTransaction};
use crate::vault::KeyVault;

use super::dto::*;
use super::error::CustodialError;
use super::registry::WalletRegistry;

/// Coordinates signing, submission and persistence for custodial wallets.
pub struct TransactionCoordinator {
    db: Arc<Database>,
    vault: Arc<KeyVault>,
    registry: Arc<WalletRegistry>,
    gateway: Arc<dyn ChainGateway>,
}

impl TransactionCoordinator {
    pub fn new(
        db: Arc<Database>,
        vault: Arc<KeyVault>,
        registry: Arc<WalletRegistry>,
        gateway: Arc<dyn ChainGateway>,
    ) -> Self {
        Self {
            db,
            vault,
            registry,
            gateway,
        }
    }

    /// Native balance for an address on a configured chain.
    pub async fn get_balance(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<BalanceResponse, CustodialError> {
        let balance = self
            .gateway
            .get_balance(chain_id, &address.to_lowercase())
            .await?;

        Ok(BalanceResponse {
            address: address.to_string(),
            balance,
        })
    }

    /// Sign a message with the user's wallet and persist the encrypted
    /// signature.
    pub async fn sign_message(
        &self,
        dynamic_user_id: &str,
        address: &str,
        message: &str,
    ) -> Result<SignedMessage, CustodialError> {
        let signing = self
            .registry
            .resolve_signing_wallet(dynamic_user_id, address)
            .await?;

        let signature = signing.signer.sign_message(message.as_bytes()).await?;
        let signature = format!("0x{}", hex::encode(signature.as_bytes()));

        // Encrypt the signature before it touches storage
        let sealed = self.vault.encrypt(&signature, None)?;
        self.db
            .insert_message(signing.wallet.id, message, &sealed.ciphertext, &sealed.iv)
            .await?;

        Ok(SignedMessage {
            address: address.to_string(),
            message: message.to_string(),
            signature,
        })
    }

    /// Submit a native-value transfer from the user's wallet.
    ///
    /// Refuses with `HasPendingTransaction` while the wallet's latest
    /// submission on this chain has no receipt yet.
    pub async fn send_transaction(
        &self,
        dynamic_user_id: &str,
        chain_id: u64,
        address: &str,
        to: &str,
        amount_in_eth: f64,
    ) -> Result<SendTransactionReceipt, CustodialError> {
        if let Some(last) = self.db.latest_transaction(chain_id, address).await {
            match self
                .gateway
                .get_transaction_receipt(chain_id, &last.transaction_hash)
                .await?
            {
                Some(receipt) => tracing::debug!(
                    chain_id,
                    block_number = receipt.block_number,
                    success = receipt.success,
                    "Previous transaction sealed, proceeding"
                ),
                None => {
                    tracing::info!(
                        chain_id,
                        address,
                        pending_hash = %last.transaction_hash,
                        "Rejecting submission: previous transaction still unsealed"
                    );
                    return Err(CustodialError::HasPendingTransaction(
                        last.transaction_hash,
                    ));
                }
            }
        }

        let signing = self
            .registry
            .resolve_signing_wallet(dynamic_user_id, address)
            .await?;

        let submitted = self
            .gateway
            .submit_transaction(chain_id, signing.signer, to, &amount_in_eth.to_string())
            .await?;

        // Tag internal transfers: is the recipient one of ours, owned by
        // anyone?
        let to_wallet = self.db.find_wallet_by_address(to).await;
        let is_internal = to_wallet.is_some();

        self.db
            .insert_transaction(NewTransaction {
                wallet_id: signing.wallet.id,
                chain_id,
                to_address: to.to_string(),
                amount_in_eth,
                transaction_hash: submitted.transaction_hash.clone(),
                nonce: submitted.nonce,
                is_internal,
                to_wallet_id: to_wallet.map(|w| w.id),
            })
            .await?;

        Ok(SendTransactionReceipt {
            chain_id,
            address: address.to_string(),
            to: to.to_string(),
            amount_in_eth,
            transaction_hash: submitted.transaction_hash,
            nonce: submitted.nonce,
        })
    }

    /// Paginated signed-message history for the user's wallet.
    ///
    /// `page` values below 1 are clamped, not rejected. A page size larger
    /// than the total count reports exactly one page.
    pub async fn get_message_history(
        &self,
        dynamic_user_id: &str,
        address: &str,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PaginatedMessages, CustodialError> {
        let signing = self
            .registry
            .resolve_signing_wallet(dynamic_user_id, address)
            .await?;

        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(20);
        let effective_page = page.max(1);
        let skip = (page_size.max(0) * (effective_page - 1)) as usize;
        let take = page_size.max(0) as usize;

        let (messages, total_count) = self.db.message_page(signing.wallet.id, skip, take).await;
        let total_count = total_count as i64;

        let size = page_size.max(1);
        let total_pages = if total_count < size {
            1
        } else {
            (total_count + size - 1) / size
        };

        Ok(PaginatedMessages {
            page,
            page_size,
            total_count,
            total_pages,
            items: messages
                .into_iter()
                .map(|m| MessageItem {
                    address: address.to_string(),
                    message: m.message,
                    created_at: m.created_at,
                })
                .collect(),
        })
    }

    /// Reconciled transaction history: on-chain transfers enriched with
    /// internal-transfer metadata, plus locally tracked submissions the
    /// indexer has not surfaced yet.
    pub async fn get_transaction_history(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<Vec<HistoryEntry>, CustodialError> {
        let transfers = self
            .gateway
            .get_transaction_history(chain_id, address)
            .await?;

        let onchain_hashes: Vec<String> = transfers.iter().map(|t| t.hash.clone()).collect();

        // Only local rows at or after the earliest nonce visible on-chain
        // can still be in flight; older ones failed to broadcast or were
        // superseded.
        let min_nonce = transfers.iter().map(|t| t.nonce).min().unwrap_or(0);

        let linked = self
            .db
            .transactions_by_hashes(chain_id, &onchain_hashes, address)
            .await;

        let mut onchain: Vec<HistoryEntry> = transfers
            .into_iter()
            .map(|transfer| {
                let direction = if transfer.from.eq_ignore_ascii_case(address) {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                };

                let local = linked
                    .iter()
                    .find(|l| l.record.transaction_hash == transfer.hash);
                let nick_name = local.and_then(|l| match direction {
                    // For an incoming transfer the counterparty is the
                    // sending wallet; for an outgoing one the recipient.
                    Direction::Incoming => Some(l.sender_nick_name.clone()),
                    Direction::Outgoing => l.recipient_nick_name.clone(),
                });

                HistoryEntry {
                    from: transfer.from,
                    to: transfer.to,
                    transaction_hash: transfer.hash,
                    nonce: transfer.nonce,
                    sealed: true,
                    amount_in_eth: format_amount(transfer.value, 18),
                    is_internal: local.map(|l| l.record.is_internal).unwrap_or(false),
                    nick_name,
                    direction,
                    created_at: transfer.timestamp,
                }
            })
            .collect();

        let pending: Vec<HistoryEntry> = self
            .db
            .pending_transactions(chain_id, address, &onchain_hashes, min_nonce)
            .await
            .into_iter()
            .map(|l: LinkedTransaction| HistoryEntry {
                from: address.to_string(),
                to: l.record.to_address,
                transaction_hash: l.record.transaction_hash,
                nonce: l.record.nonce,
                sealed: false,
                amount_in_eth: l.record.amount_in_eth.to_string(),
                is_internal: l.record.is_internal,
                nick_name: l.recipient_nick_name,
                // a wallet only records its own outgoing submissions
                direction: Direction::Outgoing,
                created_at: l.record.created_at,
            })
            .collect();

        // Pending first, then best-effort recency across both sources;
        // the two oracles use different clocks, so this is not a total
        // order guarantee.
        let mut merged = pending;
        merged.extend(onchain.drain(..));
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(merged)
    }
}
