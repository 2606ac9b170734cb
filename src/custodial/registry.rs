// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wallet registry: who owns which custodial wallets.
//!
//! Wallet creation generates the key pair, encrypts the private key and
//! upserts the owning user with the wallet attached in one logical
//! operation. Signing-wallet resolution is always scoped to the owner: a
//! caller cannot obtain a signer for another user's wallet even with the
//! right address.

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;

use crate::storage::{CustodialWallet, Database, NewWallet};
use crate::vault::{generate_key_pair, signer_from_hex, KeyVault};

use super::dto::{CreatedWallet, WalletSummary};
use super::error::CustodialError;

/// A resolved wallet with its decrypted signing key.
///
/// Lives only for the duration of one signing operation.
pub struct SigningWallet {
    pub wallet: CustodialWallet,
    pub signer: PrivateKeySigner,
}

/// Registry over the custodial wallet set.
pub struct WalletRegistry {
    db: Arc<Database>,
    vault: Arc<KeyVault>,
}

impl WalletRegistry {
    pub fn new(db: Arc<Database>, vault: Arc<KeyVault>) -> Self {
        Self { db, vault }
    }

    /// All wallets owned by the user, ascending by creation time. Unknown
    /// users get an empty list, not an error.
    pub async fn list_wallets(&self, dynamic_user_id: &str) -> Vec<WalletSummary> {
        self.db
            .wallets_for_user(dynamic_user_id)
            .await
            .into_iter()
            .map(|wallet| WalletSummary {
                address: wallet.address,
                nick_name: wallet.nick_name,
                public_key: wallet.public_key,
                created_at: wallet.created_at,
            })
            .collect()
    }

    /// Generate and store a new wallet for the user, creating the user
    /// row if this is their first.
    pub async fn create_wallet(
        &self,
        dynamic_user_id: &str,
    ) -> Result<CreatedWallet, CustodialError> {
        let pair = generate_key_pair();

        // Encrypt the private key for storage
        let sealed = self.vault.encrypt(&pair.private_key, None)?;

        // Two concurrent creations for the same user can read the same
        // count and produce duplicate nicknames; the wallet rows stay
        // unique regardless. Known race, left as is.
        let total_wallets = self.db.count_wallets(dynamic_user_id).await;
        let nick_name = format!("Account {}", total_wallets + 1);

        let wallet = self
            .db
            .upsert_user_with_wallet(
                dynamic_user_id,
                NewWallet {
                    address: pair.address,
                    nick_name,
                    public_key: pair.public_key,
                    encrypted_private_key: sealed.ciphertext,
                    encryption_iv: sealed.iv,
                },
            )
            .await?;

        tracing::info!(
            address = %wallet.address,
            nick_name = %wallet.nick_name,
            "Custodial wallet created"
        );

        Ok(CreatedWallet {
            address: wallet.address,
            nick_name: wallet.nick_name,
            public_key: wallet.public_key,
        })
    }

    /// Resolve a wallet by address, scoped to the owner, and decrypt its
    /// signing key.
    pub async fn resolve_signing_wallet(
        &self,
        dynamic_user_id: &str,
        address: &str,
    ) -> Result<SigningWallet, CustodialError> {
        let wallet = self
            .db
            .find_wallet_for_user(dynamic_user_id, address)
            .await
            .ok_or_else(|| CustodialError::WalletNotFound(address.to_string()))?;

        let private_key = self
            .vault
            .decrypt(&wallet.encrypted_private_key, &wallet.encryption_iv)?;
        let signer = signer_from_hex(&private_key)?;

        Ok(SigningWallet { wallet, signer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> WalletRegistry {
        let db = Arc::new(Database::new());
        let vault = Arc::new(KeyVault::new([0x42; 32]));
        WalletRegistry::new(db, vault)
    }

    #[tokio::test]
    async fn sequential_creations_number_nicknames() {
        let registry = test_registry();

        for expected in ["Account 1", "Account 2", "Account 3"] {
            let created = registry.create_wallet("user-1").await.unwrap();
            assert_eq!(created.nick_name, expected);
        }

        // a different user starts from 1 again
        let created = registry.create_wallet("user-2").await.unwrap();
        assert_eq!(created.nick_name, "Account 1");
    }

    #[tokio::test]
    async fn list_wallets_orders_by_creation_and_is_empty_for_unknown_users() {
        let registry = test_registry();

        let first = registry.create_wallet("user-1").await.unwrap();
        let second = registry.create_wallet("user-1").await.unwrap();

        let wallets = registry.list_wallets("user-1").await;
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].address, first.address);
        assert_eq!(wallets[1].address, second.address);
        assert!(wallets[0].created_at <= wallets[1].created_at);

        assert!(registry.list_wallets("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn resolve_decrypts_to_matching_signer() {
        let registry = test_registry();
        let created = registry.create_wallet("user-1").await.unwrap();

        // case-insensitive address match
        let resolved = registry
            .resolve_signing_wallet("user-1", &created.address.to_lowercase())
            .await
            .unwrap();

        assert_eq!(
            resolved.signer.address().to_checksum(None),
            created.address
        );
        assert_eq!(resolved.wallet.address, created.address);
    }

    #[tokio::test]
    async fn resolve_is_owner_scoped() {
        let registry = test_registry();
        let created = registry.create_wallet("user-1").await.unwrap();

        let result = registry
            .resolve_signing_wallet("user-2", &created.address)
            .await;
        assert!(matches!(
            result,
            Err(CustodialError::WalletNotFound(addr)) if addr == created.address
        ));
    }

    #[tokio::test]
    async fn resolve_unknown_address_fails() {
        let registry = test_registry();
        registry.create_wallet("user-1").await.unwrap();

        let result = registry
            .resolve_signing_wallet("user-1", "0x0000000000000000000000000000000000000000")
            .await;
        assert!(matches!(result, Err(CustodialError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn resolve_with_wrong_vault_key_fails_as_decryption() {
        let db = Arc::new(Database::new());
        let registry = WalletRegistry::new(db.clone(), Arc::new(KeyVault::new([0x42; 32])));
        let created = registry.create_wallet("user-1").await.unwrap();

        // same rows, different process key
        let other = WalletRegistry::new(db, Arc::new(KeyVault::new([0x43; 32])));
        let result = other
            .resolve_signing_wallet("user-1", &created.address)
            .await;
        assert!(matches!(result, Err(CustodialError::Cipher(_))));
    }
}
