// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared application state wired at startup.

use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::blockchain::ChainGateway;
use crate::config::Config;
use crate::custodial::{TransactionCoordinator, WalletRegistry};
use crate::storage::Database;
use crate::vault::KeyVault;

/// Handles shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WalletRegistry>,
    pub coordinator: Arc<TransactionCoordinator>,
    pub auth: Arc<AuthVerifier>,
}

impl AppState {
    /// Wire the component graph: store and vault are shared by the
    /// registry and the coordinator; the chain gateway is injected so
    /// deployments (and tests) can choose the implementation.
    pub fn new(
        config: &Config,
        gateway: Arc<dyn ChainGateway>,
    ) -> Result<Self, crate::auth::AuthError> {
        let db = Arc::new(Database::new());
        let vault = Arc::new(KeyVault::new(config.wallet_encryption_key));
        let registry = Arc::new(WalletRegistry::new(db.clone(), vault.clone()));
        let coordinator = Arc::new(TransactionCoordinator::new(
            db,
            vault,
            registry.clone(),
            gateway,
        ));
        let auth = Arc::new(AuthVerifier::new(config.dynamic_public_key_pem.as_deref())?);

        Ok(Self {
            registry,
            coordinator,
            auth,
        })
    }
}
