use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::models::{CreatePayoutRequest, Payout, PayoutCreated, StatusUpdateRequest, StatusUpdated};
use crate::AppState;

/// POST /payouts: Register a payout request and quote its fiat amount.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreatePayoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PayoutCreated>), AppError> {
    let Json(req) = body?;
    let id = req.id.clone();

    match state.ledger.create_payout(req).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => {
            tracing::warn!(id = %id, code = e.code(), "Payout creation rejected");
            Err(e)
        }
    }
}

/// POST /update-payout-status: Approve or revoke a payout and refresh its expiry.
pub async fn update_status(
    State(state): State<AppState>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<StatusUpdated>, AppError> {
    let Json(req) = body?;
    let updated = state.ledger.update_status(req).await?;
    Ok(Json(updated))
}

/// GET /payout-info/:id: Full payout record.
pub async fn info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payout>, AppError> {
    let payout = state.ledger.get_payout(&id).await?;
    Ok(Json(payout))
}
