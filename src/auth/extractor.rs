// SPDX-License-Identifier: AGPL-3.0-or-later

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user.dynamic_user_id is the verified caller
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::claims::DynamicClaims;
use super::{AuthenticatedUser, AuthError};
use crate::state::AppState;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Verifies bearer tokens against the identity provider's public key.
///
/// ## Authentication Modes
///
/// - **Production mode** (public key configured): full RS256 signature
///   verification
/// - **Development mode** (no key): structure and expiry validation only
pub struct AuthVerifier {
    decoding_key: Option<DecodingKey>,
}

impl AuthVerifier {
    /// Build a verifier from an optional PEM-encoded RSA public key.
    pub fn new(public_key_pem: Option<&str>) -> Result<Self, AuthError> {
        let decoding_key = match public_key_pem {
            Some(pem) => Some(
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::InvalidKey(e.to_string()))?,
            ),
            None => {
                tracing::warn!("No identity provider key configured; running auth in development mode");
                None
            }
        };

        Ok(Self { decoding_key })
    }

    /// Verify a bearer token and extract the caller.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        match &self.decoding_key {
            Some(key) => verify_production(token, key),
            None => verify_development(token),
        }
    }
}

/// Full RS256 verification against the configured public key.
fn verify_production(token: &str, key: &DecodingKey) -> Result<AuthenticatedUser, AuthError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.validate_aud = false;

    let token_data =
        decode::<DynamicClaims>(token, key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        })?;

    Ok(AuthenticatedUser::from_claims(token_data.claims))
}

/// Development verification (no signature check).
///
/// WARNING: This should only be used in development environments.
fn verify_development(token: &str) -> Result<AuthenticatedUser, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<DynamicClaims>(token)
        .map_err(|_| AuthError::MalformedToken)?;

    let claims = token_data.claims;

    // Check expiration manually
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
        return Err(AuthError::TokenExpired);
    }

    Ok(AuthenticatedUser::from_claims(claims))
}

/// Extractor for authenticated users.
///
/// Validates the JWT from the Authorization header and yields the caller
/// identity.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.auth.verify(token)?;
        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use axum::http::Request;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    /// Hand-built unsigned JWT for development-mode tests.
    fn test_jwt(user_id: &str, exp: i64) -> String {
        let header = r#"{"alg":"RS256","typ":"JWT"}"#;
        let claims = format!(
            r#"{{"sub":"{user_id}","iat":1609459200,"exp":{exp},"iss":"app.dynamicauth.com"}}"#
        );

        let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());

        format!("{header_b64}.{claims_b64}.fake_signature")
    }

    #[tokio::test]
    async fn extractor_requires_auth_header() {
        let state = test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn extractor_rejects_non_bearer_header() {
        let state = test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwdw==")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn extractor_accepts_dev_mode_jwt() {
        let state = test_state();
        let token = test_jwt("dyn_user_123", 9_999_999_999);
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.dynamic_user_id, "dyn_user_123");
    }

    #[tokio::test]
    async fn extractor_rejects_expired_dev_mode_jwt() {
        let state = test_state();
        let token = test_jwt("dyn_user_123", 1_600_000_000);
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn verifier_rejects_garbage_pem() {
        let result = AuthVerifier::new(Some("not a pem"));
        assert!(matches!(result, Err(AuthError::InvalidKey(_))));
    }

    #[test]
    fn dev_verifier_rejects_garbage_tokens() {
        let verifier = AuthVerifier::new(None).unwrap();
        assert!(matches!(
            verifier.verify("garbage"),
            Err(AuthError::MalformedToken)
        ));
    }
}
