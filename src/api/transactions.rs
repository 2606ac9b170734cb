// SPDX-License-Identifier: AGPL-3.0-or-later

//! Transaction submission and reconciled history endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    custodial::{HistoryEntry, SendTransactionReceipt},
    error::ApiError,
    state::AppState,
};

/// Request to submit a native-value transfer.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionRequest {
    /// Chain id of the target network.
    pub chain_id: u64,
    /// Sending wallet address (must be owned by the caller).
    pub address: String,
    /// Recipient address.
    pub to: String,
    /// Amount in ether.
    pub amount_in_eth: f64,
}

/// Submit a transaction from a custodial wallet.
///
/// Refused while the wallet's previous transaction on the chain is still
/// unsealed.
#[utoipa::path(
    post,
    path = "/custodial/wallet/sendTransaction",
    tag = "Custodial",
    security(("bearer_auth" = [])),
    request_body = SendTransactionRequest,
    responses(
        (status = 201, description = "Transaction broadcast", body = SendTransactionReceipt),
        (status = 400, description = "Unsupported chain, pending transaction, insufficient funds or rate limiting"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found for this user")
    )
)]
pub async fn send_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<SendTransactionRequest>,
) -> Result<(StatusCode, Json<SendTransactionReceipt>), ApiError> {
    let receipt = state
        .coordinator
        .send_transaction(
            &user.dynamic_user_id,
            request.chain_id,
            &request.address,
            &request.to,
            request.amount_in_eth,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Reconciled transaction history for an address.
///
/// Merges up to 100 indexed on-chain transfers with locally tracked
/// submissions that have not been indexed yet (`sealed = false`).
#[utoipa::path(
    get,
    path = "/custodial/wallet/transactions/{chain_id}/{address}",
    tag = "Custodial",
    params(
        ("chain_id" = u64, Path, description = "Chain id of the network"),
        ("address" = String, Path, description = "Wallet address")
    ),
    responses(
        (status = 200, description = "Merged on-chain and pending history", body = [HistoryEntry]),
        (status = 400, description = "Unsupported chain id")
    )
)]
pub async fn get_transaction_history(
    State(state): State<AppState>,
    Path((chain_id, address)): Path<(u64, String)>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let history = state
        .coordinator
        .get_transaction_history(chain_id, &address)
        .await?;
    Ok(Json(history))
}
