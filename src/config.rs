// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and handed
//! to the components that need it. The wallet encryption key is required;
//! everything else has a workable default for testnet deployments.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WALLET_ENCRYPTION_KEY` | 64-char hex (32 bytes), AES-256 key for keys at rest | Required |
//! | `DYNAMIC_PUBLIC_KEY` | RSA public key (PEM) for bearer-token verification | None (dev mode) |
//! | `SEPOLIA_RPC_URL` | JSON-RPC endpoint for Sepolia | Public endpoint |
//! | `BASE_SEPOLIA_RPC_URL` | JSON-RPC endpoint for Base Sepolia | Public endpoint |
//! | `ETHERSCAN_API_KEY` | API key for the transfer indexer | Empty |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable holding the hex-encoded AES-256 key.
pub const WALLET_ENCRYPTION_KEY_ENV: &str = "WALLET_ENCRYPTION_KEY";

/// Environment variable holding the identity provider's RSA public key (PEM).
pub const DYNAMIC_PUBLIC_KEY_ENV: &str = "DYNAMIC_PUBLIC_KEY";

/// Errors raised while loading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{WALLET_ENCRYPTION_KEY_ENV} is not set in the environment")]
    MissingEncryptionKey,

    #[error("{WALLET_ENCRYPTION_KEY_ENV} must be 64 hex characters (32 bytes): {0}")]
    InvalidEncryptionKey(String),
}

/// Startup configuration for the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Process-wide AES-256 key protecting private keys at rest.
    pub wallet_encryption_key: [u8; 32],
    /// PEM-encoded RSA public key for JWT verification. `None` runs the
    /// auth layer in development mode (no signature check).
    pub dynamic_public_key_pem: Option<String>,
    /// Override for the Sepolia JSON-RPC endpoint.
    pub sepolia_rpc_url: Option<String>,
    /// Override for the Base Sepolia JSON-RPC endpoint.
    pub base_sepolia_rpc_url: Option<String>,
    /// API key passed to the Etherscan-compatible transfer indexer.
    pub etherscan_api_key: String,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails fast when the wallet encryption key is absent or malformed;
    /// a service that cannot decrypt its keys must not come up.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key_hex =
            env::var(WALLET_ENCRYPTION_KEY_ENV).map_err(|_| ConfigError::MissingEncryptionKey)?;
        let wallet_encryption_key = parse_encryption_key(&key_hex)?;

        Ok(Self {
            wallet_encryption_key,
            dynamic_public_key_pem: env::var(DYNAMIC_PUBLIC_KEY_ENV).ok(),
            sepolia_rpc_url: env::var("SEPOLIA_RPC_URL").ok(),
            base_sepolia_rpc_url: env::var("BASE_SEPOLIA_RPC_URL").ok(),
            etherscan_api_key: env::var("ETHERSCAN_API_KEY").unwrap_or_default(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        })
    }
}

/// Decode and validate the hex-encoded AES-256 key.
pub fn parse_encryption_key(key_hex: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = hex::decode(key_hex.trim())
        .map_err(|e| ConfigError::InvalidEncryptionKey(e.to_string()))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| ConfigError::InvalidEncryptionKey(format!("got {} bytes", bytes.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_encryption_key_accepts_64_hex_chars() {
        let key = parse_encryption_key(&"ab".repeat(32)).unwrap();
        assert_eq!(key, [0xab; 32]);
    }

    #[test]
    fn parse_encryption_key_rejects_short_keys() {
        let err = parse_encryption_key("abcd").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEncryptionKey(_)));
    }

    #[test]
    fn parse_encryption_key_rejects_non_hex() {
        let err = parse_encryption_key(&"zz".repeat(32)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEncryptionKey(_)));
    }
}
