// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-process repository store.
//!
//! Row ordering is `(created_at, id)` so results stay deterministic when
//! timestamps collide. Address comparisons are case-insensitive
//! throughout; hashes are compared exactly (both sources emit canonical
//! lowercase hex).

use chrono::Utc;
use tokio::sync::RwLock;

use super::models::*;

/// Errors raised by store writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Wallet with address {0} already exists")]
    DuplicateAddress(String),

    #[error("Wallet {0} does not exist")]
    MissingWallet(i64),
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    wallets: Vec<CustodialWallet>,
    messages: Vec<MessageHistory>,
    transactions: Vec<TransactionHistory>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_id_for(&self, dynamic_user_id: &str) -> Option<i64> {
        self.users
            .iter()
            .find(|u| u.dynamic_user_id == dynamic_user_id)
            .map(|u| u.id)
    }

    fn wallet(&self, wallet_id: i64) -> Option<&CustodialWallet> {
        self.wallets.iter().find(|w| w.id == wallet_id)
    }
}

/// The relational store shared by the registry and the coordinator.
#[derive(Default)]
pub struct Database {
    inner: RwLock<Inner>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the user if absent and attach a new wallet row, as one
    /// logical operation. Idempotent on the user; the wallet address must
    /// be globally unique.
    pub async fn upsert_user_with_wallet(
        &self,
        dynamic_user_id: &str,
        new_wallet: NewWallet,
    ) -> Result<CustodialWallet, StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .wallets
            .iter()
            .any(|w| w.address.eq_ignore_ascii_case(&new_wallet.address))
        {
            return Err(StoreError::DuplicateAddress(new_wallet.address));
        }

        let user_id = match inner.user_id_for(dynamic_user_id) {
            Some(id) => id,
            None => {
                let id = inner.next_id();
                inner.users.push(User {
                    id,
                    dynamic_user_id: dynamic_user_id.to_string(),
                    created_at: Utc::now(),
                });
                id
            }
        };

        let id = inner.next_id();
        let wallet = CustodialWallet {
            id,
            user_id,
            address: new_wallet.address,
            nick_name: new_wallet.nick_name,
            public_key: new_wallet.public_key,
            encrypted_private_key: new_wallet.encrypted_private_key,
            encryption_iv: new_wallet.encryption_iv,
            created_at: Utc::now(),
        };
        inner.wallets.push(wallet.clone());

        Ok(wallet)
    }

    /// Number of wallets currently owned by a user.
    pub async fn count_wallets(&self, dynamic_user_id: &str) -> usize {
        let inner = self.inner.read().await;
        match inner.user_id_for(dynamic_user_id) {
            Some(user_id) => inner.wallets.iter().filter(|w| w.user_id == user_id).count(),
            None => 0,
        }
    }

    /// All wallets owned by a user, ascending by creation time.
    pub async fn wallets_for_user(&self, dynamic_user_id: &str) -> Vec<CustodialWallet> {
        let inner = self.inner.read().await;
        let Some(user_id) = inner.user_id_for(dynamic_user_id) else {
            return Vec::new();
        };

        let mut wallets: Vec<CustodialWallet> = inner
            .wallets
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        wallets.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        wallets
    }

    /// Look up a wallet by address, scoped to its owner.
    pub async fn find_wallet_for_user(
        &self,
        dynamic_user_id: &str,
        address: &str,
    ) -> Option<CustodialWallet> {
        let inner = self.inner.read().await;
        let user_id = inner.user_id_for(dynamic_user_id)?;
        inner
            .wallets
            .iter()
            .find(|w| w.user_id == user_id && w.address.eq_ignore_ascii_case(address))
            .cloned()
    }

    /// Look up a wallet by address across all users.
    ///
    /// Internal-transfer detection only; never exposed through the API, so
    /// the ownership scoping of the other lookups stays intact.
    pub async fn find_wallet_by_address(&self, address: &str) -> Option<CustodialWallet> {
        let inner = self.inner.read().await;
        inner
            .wallets
            .iter()
            .find(|w| w.address.eq_ignore_ascii_case(address))
            .cloned()
    }

    /// Append a signed-message record.
    pub async fn insert_message(
        &self,
        wallet_id: i64,
        message: &str,
        encrypted_signature: &str,
        signature_iv: &str,
    ) -> Result<MessageHistory, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.wallet(wallet_id).is_none() {
            return Err(StoreError::MissingWallet(wallet_id));
        }

        let id = inner.next_id();
        let record = MessageHistory {
            id,
            wallet_id,
            message: message.to_string(),
            encrypted_signature: encrypted_signature.to_string(),
            signature_iv: signature_iv.to_string(),
            created_at: Utc::now(),
        };
        inner.messages.push(record.clone());
        Ok(record)
    }

    /// A window of message records for a wallet, newest first, plus the
    /// total count.
    pub async fn message_page(
        &self,
        wallet_id: i64,
        skip: usize,
        take: usize,
    ) -> (Vec<MessageHistory>, usize) {
        let inner = self.inner.read().await;
        let mut messages: Vec<MessageHistory> = inner
            .messages
            .iter()
            .filter(|m| m.wallet_id == wallet_id)
            .cloned()
            .collect();
        let total = messages.len();

        messages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let page = messages.into_iter().skip(skip).take(take).collect();
        (page, total)
    }

    /// Append a transaction row.
    pub async fn insert_transaction(
        &self,
        new_tx: NewTransaction,
    ) -> Result<TransactionHistory, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.wallet(new_tx.wallet_id).is_none() {
            return Err(StoreError::MissingWallet(new_tx.wallet_id));
        }

        let id = inner.next_id();
        let record = TransactionHistory {
            id,
            wallet_id: new_tx.wallet_id,
            chain_id: new_tx.chain_id,
            to_address: new_tx.to_address,
            amount_in_eth: new_tx.amount_in_eth,
            transaction_hash: new_tx.transaction_hash,
            nonce: new_tx.nonce,
            is_internal: new_tx.is_internal,
            to_wallet_id: new_tx.to_wallet_id,
            created_at: Utc::now(),
        };
        inner.transactions.push(record.clone());
        Ok(record)
    }

    /// The most recently created transaction row for a sending wallet on a
    /// chain. This is the row the pending-transaction guard inspects.
    pub async fn latest_transaction(
        &self,
        chain_id: u64,
        from_address: &str,
    ) -> Option<TransactionHistory> {
        let inner = self.inner.read().await;
        inner
            .transactions
            .iter()
            .filter(|t| t.chain_id == chain_id)
            .filter(|t| {
                inner
                    .wallet(t.wallet_id)
                    .is_some_and(|w| w.address.eq_ignore_ascii_case(from_address))
            })
            .max_by_key(|t| (t.created_at, t.id))
            .cloned()
    }

    /// Transaction rows on a chain whose hash is in `hashes`, joined on
    /// either the sending wallet or the internal recipient matching
    /// `address`. Used to recover internal-transfer metadata for on-chain
    /// entries.
    pub async fn transactions_by_hashes(
        &self,
        chain_id: u64,
        hashes: &[String],
        address: &str,
    ) -> Vec<LinkedTransaction> {
        let inner = self.inner.read().await;
        inner
            .transactions
            .iter()
            .filter(|t| t.chain_id == chain_id && hashes.contains(&t.transaction_hash))
            .filter(|t| {
                let sender_matches = inner
                    .wallet(t.wallet_id)
                    .is_some_and(|w| w.address.eq_ignore_ascii_case(address));
                let recipient_matches = t
                    .to_wallet_id
                    .and_then(|id| inner.wallet(id))
                    .is_some_and(|w| w.address.eq_ignore_ascii_case(address));
                sender_matches || recipient_matches
            })
            .map(|t| link(&inner, t))
            .collect()
    }

    /// Transaction rows for a sending wallet on a chain that the indexer
    /// has not surfaced yet: hash outside `exclude_hashes` and nonce at or
    /// after `min_nonce`.
    pub async fn pending_transactions(
        &self,
        chain_id: u64,
        from_address: &str,
        exclude_hashes: &[String],
        min_nonce: u64,
    ) -> Vec<LinkedTransaction> {
        let inner = self.inner.read().await;
        inner
            .transactions
            .iter()
            .filter(|t| t.chain_id == chain_id)
            .filter(|t| {
                inner
                    .wallet(t.wallet_id)
                    .is_some_and(|w| w.address.eq_ignore_ascii_case(from_address))
            })
            .filter(|t| !exclude_hashes.contains(&t.transaction_hash))
            .filter(|t| t.nonce >= min_nonce)
            .map(|t| link(&inner, t))
            .collect()
    }
}

fn link(inner: &Inner, record: &TransactionHistory) -> LinkedTransaction {
    LinkedTransaction {
        sender_nick_name: inner
            .wallet(record.wallet_id)
            .map(|w| w.nick_name.clone())
            .unwrap_or_default(),
        recipient_nick_name: record
            .to_wallet_id
            .and_then(|id| inner.wallet(id))
            .map(|w| w.nick_name.clone()),
        record: record.clone(),
    }
}
