// SPDX-License-Identifier: AGPL-3.0-or-later

//! JWT claims and the authenticated caller representation.

use serde::Deserialize;

/// Claims decoded from a Dynamic bearer token.
///
/// Only `sub` is consumed; the remaining registered claims exist for
/// serde deserialization and expiry validation.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicClaims {
    /// Subject - the canonical Dynamic user identifier.
    pub sub: String,

    /// Issued at timestamp.
    #[serde(default)]
    #[allow(dead_code)]
    pub iat: i64,

    /// Expiration timestamp.
    #[serde(default)]
    pub exp: i64,

    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,

    /// Session id, when the provider includes one.
    #[serde(default)]
    pub sid: Option<String>,
}

/// The authenticated caller, as seen by every handler.
///
/// The core performs no verification beyond the token signature: the
/// `sub` claim is trusted as the user id.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Canonical user id (the token's `sub` claim).
    pub dynamic_user_id: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: DynamicClaims) -> Self {
        Self {
            dynamic_user_id: claims.sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_takes_sub_as_user_id() {
        let claims = DynamicClaims {
            sub: "dyn_user_123".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
            iss: Some("app.dynamicauth.com".to_string()),
            sid: None,
        };
        let user = AuthenticatedUser::from_claims(claims);
        assert_eq!(user.dynamic_user_id, "dyn_user_123");
    }
}
