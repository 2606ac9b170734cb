// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Key Vault
//!
//! Key-pair generation and symmetric encryption of secret material.
//!
//! Private keys and message signatures are encrypted with a single
//! process-wide AES-256 key before they touch storage; the ciphertext and
//! its initialization vector are always stored together. Compromise of the
//! database alone therefore does not expose key material; compromise of
//! the process key defeats all wallets, which is an accepted limit of this
//! design.

pub mod cipher;
pub mod keygen;

pub use cipher::{CipherError, Encrypted, KeyVault};
pub use keygen::{generate_key_pair, signer_from_hex, KeyPair};
