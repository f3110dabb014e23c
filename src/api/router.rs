use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let payouts = Router::new()
        .route("/payouts", post(handlers::payouts::create))
        .route("/update-payout-status", post(handlers::payouts::update_status))
        .route("/payout-info/:id", get(handlers::payouts::info));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(payouts)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
