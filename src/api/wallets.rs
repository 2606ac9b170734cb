// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wallet listing, creation and balance endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    custodial::{BalanceResponse, CreatedWallet, WalletSummary},
    error::ApiError,
    state::AppState,
};

/// List the authenticated user's custodial wallets.
///
/// Ordered by creation time; users without wallets get an empty list.
#[utoipa::path(
    get,
    path = "/custodial/wallets",
    tag = "Custodial",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Custodial wallets for the authenticated user", body = [WalletSummary]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_wallets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletSummary>>, ApiError> {
    Ok(Json(state.registry.list_wallets(&user.dynamic_user_id).await))
}

/// Create a new custodial wallet for the authenticated user.
///
/// Generates a key pair, encrypts the private key at rest and assigns the
/// next default nickname. The private key is never returned.
#[utoipa::path(
    post,
    path = "/custodial/wallet",
    tag = "Custodial",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Wallet created", body = CreatedWallet),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreatedWallet>), ApiError> {
    let wallet = state.registry.create_wallet(&user.dynamic_user_id).await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

/// Native balance for an address on a supported chain.
#[utoipa::path(
    get,
    path = "/custodial/wallet/balance/{chain_id}/{address}",
    tag = "Custodial",
    params(
        ("chain_id" = u64, Path, description = "Chain id of the network"),
        ("address" = String, Path, description = "Address to query")
    ),
    responses(
        (status = 200, description = "Balance in ether", body = BalanceResponse),
        (status = 400, description = "Unsupported chain id")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path((chain_id, address)): Path<(u64, String)>,
) -> Result<Json<BalanceResponse>, ApiError> {
    Ok(Json(state.coordinator.get_balance(chain_id, &address).await?))
}
