use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::domain::{BalanceView, JournalRequest, TransferReceipt, TransferRequest};

use super::{ApiError, AppState, JournalError};

/// `POST /api/initiate-transfer`
pub async fn initiate_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferReceipt>, ApiError> {
    let receipt = state.initiate_transfer(&request).await?;
    Ok(Json(receipt))
}

/// `GET /api/balances`
pub async fn list_balances(State(state): State<AppState>) -> Json<Vec<BalanceView>> {
    Json(state.list_balances().await)
}

/// `POST /transfer`
pub async fn record_journal_transfer(
    State(state): State<AppState>,
    Json(request): Json<JournalRequest>,
) -> Result<Json<Value>, JournalError> {
    state.record_journal_transfer(&request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Transfer initiated",
    })))
}

/// `GET /health`
pub async fn health_check() -> &'static str {
    "OK"
}
