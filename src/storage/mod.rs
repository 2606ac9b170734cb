// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Storage Module
//!
//! Repository-style persistence for the relational data model: Users,
//! CustodialWallets, MessageHistory and TransactionHistory.
//!
//! The store exposes exactly the contract the custodial components need:
//! create-or-update keyed on user identity, a unique wallet address with
//! case-insensitive lookup, `createdAt` ordering, and skip/take windows.
//! The in-process implementation keeps rows behind a single `RwLock`; all
//! writes are single-row inserts (the nickname counter/create sequence is
//! deliberately not transactional, see [`crate::custodial::registry`]).

pub mod models;
pub mod store;

pub use models::{
    CustodialWallet, LinkedTransaction, MessageHistory, NewTransaction, NewWallet,
    TransactionHistory, User,
};
pub use store::{Database, StoreError};
