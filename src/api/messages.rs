// SPDX-License-Identifier: AGPL-3.0-or-later

//! Message signing and signed-message history endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::Auth,
    custodial::{PaginatedMessages, SignedMessage},
    error::ApiError,
    state::AppState,
};

/// Request to sign a message with a custodial wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageRequest {
    /// Address of the signing wallet (must be owned by the caller).
    pub address: String,
    /// Plaintext message to sign.
    pub message: String,
}

/// Query parameters for the message history page.
#[derive(Debug, Deserialize, IntoParams)]
pub struct MessagePageQuery {
    /// Page number, 1-based. Values below 1 are clamped.
    pub page: Option<i64>,
    /// Page size. Defaults to 20.
    pub limit: Option<i64>,
}

/// Sign a message with the specified custodial wallet.
///
/// The signature is returned in the clear and stored encrypted.
#[utoipa::path(
    post,
    path = "/custodial/wallet/signMessage",
    tag = "Custodial",
    security(("bearer_auth" = [])),
    request_body = SignMessageRequest,
    responses(
        (status = 201, description = "Message signed", body = SignedMessage),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found for this user")
    )
)]
pub async fn sign_message(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<SignMessageRequest>,
) -> Result<(StatusCode, Json<SignedMessage>), ApiError> {
    let signed = state
        .coordinator
        .sign_message(&user.dynamic_user_id, &request.address, &request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(signed)))
}

/// Paginated signed-message history for a wallet.
#[utoipa::path(
    get,
    path = "/custodial/wallet/messages/{address}",
    tag = "Custodial",
    security(("bearer_auth" = [])),
    params(
        ("address" = String, Path, description = "Wallet address"),
        MessagePageQuery
    ),
    responses(
        (status = 200, description = "One page of signed messages", body = PaginatedMessages),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found for this user")
    )
)]
pub async fn get_message_history(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<MessagePageQuery>,
) -> Result<Json<PaginatedMessages>, ApiError> {
    let history = state
        .coordinator
        .get_message_history(&user.dynamic_user_id, &address, query.page, query.limit)
        .await?;
    Ok(Json(history))
}
