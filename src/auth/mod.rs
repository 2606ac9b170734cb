// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Authentication Module
//!
//! Bearer-token authentication against the external identity provider
//! (Dynamic).
//!
//! ## Auth Flow
//!
//! 1. Frontend authenticates the user with Dynamic
//! 2. Frontend sends `Authorization: Bearer <JWT>`
//! 3. Server verifies the RS256 signature against the provider's public
//!    key and trusts the `sub` claim as the `dynamicUserId`
//!
//! When no public key is configured the verifier runs in development mode
//! and decodes tokens without a signature check. Clock skew tolerance is
//! 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{Auth, AuthVerifier};
