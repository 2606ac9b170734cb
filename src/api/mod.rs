// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    custodial::{
        BalanceResponse, CreatedWallet, Direction, HistoryEntry, MessageItem, PaginatedMessages,
        SendTransactionReceipt, SignedMessage, WalletSummary,
    },
    state::AppState,
};

pub mod messages;
pub mod transactions;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let custodial_routes = Router::new()
        .route("/wallets", get(wallets::list_wallets))
        .route("/wallet", post(wallets::create_wallet))
        .route(
            "/wallet/balance/{chain_id}/{address}",
            get(wallets::get_balance),
        )
        .route("/wallet/signMessage", post(messages::sign_message))
        .route(
            "/wallet/sendTransaction",
            post(transactions::send_transaction),
        )
        .route(
            "/wallet/messages/{address}",
            get(messages::get_message_history),
        )
        .route(
            "/wallet/transactions/{chain_id}/{address}",
            get(transactions::get_transaction_history),
        )
        .with_state(state);

    Router::new()
        .nest("/custodial", custodial_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallets::list_wallets,
        wallets::create_wallet,
        wallets::get_balance,
        messages::sign_message,
        messages::get_message_history,
        transactions::send_transaction,
        transactions::get_transaction_history
    ),
    components(
        schemas(
            WalletSummary,
            CreatedWallet,
            BalanceResponse,
            SignedMessage,
            SendTransactionReceipt,
            PaginatedMessages,
            MessageItem,
            HistoryEntry,
            Direction,
            messages::SignMessageRequest,
            transactions::SendTransactionRequest
        )
    ),
    tags(
        (name = "Custodial", description = "Custodial wallet management, signing and transactions")
    )
)]
struct ApiDoc;
