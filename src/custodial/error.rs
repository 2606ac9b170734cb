// SPDX-License-Identifier: AGPL-3.0-or-later

//! Domain errors raised at the registry/coordinator boundary.

use crate::blockchain::EvmError;
use crate::error::ApiError;
use crate::storage::StoreError;
use crate::vault::CipherError;

/// Errors surfaced by the custodial components.
///
/// Nothing here is retried internally: not-found, validation and conflict
/// errors are caller mistakes; throttling and funds errors are surfaced
/// for the caller to back off on; decryption and unclassified upstream
/// failures abort the request.
#[derive(Debug, thiserror::Error)]
pub enum CustodialError {
    #[error("Wallet with address {0} not found")]
    WalletNotFound(String),

    #[error("Transaction {0} is pending, please wait until it is confirmed")]
    HasPendingTransaction(String),

    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Signing failed: {0}")]
    Signer(#[from] alloy::signers::Error),
}

impl From<CustodialError> for ApiError {
    fn from(err: CustodialError) -> Self {
        let message = err.to_string();
        match err {
            CustodialError::WalletNotFound(_) => ApiError::not_found(message),

            CustodialError::HasPendingTransaction(_) => ApiError::bad_request(message),

            CustodialError::Evm(evm) => match evm {
                EvmError::InvalidChainId(_)
                | EvmError::InvalidAddress(_)
                | EvmError::InvalidAmount(_)
                | EvmError::InsufficientFunds
                | EvmError::RateLimited(_) => ApiError::bad_request(message),
                // Unclassified upstream failures pass through as fatal.
                EvmError::InvalidRpcUrl(_) | EvmError::Rpc(_) => ApiError::internal(message),
            },

            // Ciphertext/IV mismatch means corruption or a key mismatch;
            // must be distinguishable from a not-found.
            CustodialError::Cipher(_) => ApiError::internal(message),

            CustodialError::Store(_) | CustodialError::Signer(_) => ApiError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let api: ApiError = CustodialError::WalletNotFound("0xabc".to_string()).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert!(api.message.contains("0xabc"));
    }

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            CustodialError::HasPendingTransaction("0x11".to_string()),
            CustodialError::Evm(EvmError::InvalidChainId(5)),
            CustodialError::Evm(EvmError::InsufficientFunds),
            CustodialError::Evm(EvmError::RateLimited("429".to_string())),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn upstream_and_decryption_failures_map_to_500() {
        for err in [
            CustodialError::Evm(EvmError::Rpc("boom".to_string())),
            CustodialError::Cipher(CipherError::Decryption),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
