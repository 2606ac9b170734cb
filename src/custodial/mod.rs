// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Custodial Core
//!
//! The wallet registry (principal → wallets, creation, signing-wallet
//! resolution) and the transaction coordinator (message signing, guarded
//! transaction submission, history reconciliation).
//!
//! All domain errors are raised at this boundary and propagate unmodified
//! to the API layer, which maps them onto HTTP statuses.

pub mod coordinator;
pub mod dto;
pub mod error;
pub mod registry;

pub use coordinator::TransactionCoordinator;
pub use dto::{
    BalanceResponse, CreatedWallet, Direction, HistoryEntry, MessageItem, PaginatedMessages,
    SendTransactionReceipt, SignedMessage, WalletSummary,
};
pub use error::CustodialError;
pub use registry::{SigningWallet, WalletRegistry};
