use crate::models::{GenerateRequest, InvalidPrompt, RelayResponse};
use crate::services::RelayError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

/// `POST /api/generate`
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;

    let response = state.relay.generate(request).await?;

    Ok(Json(response))
}

fn reject_body(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Rejected generate request: body exceeds limit");
        return AppError::PayloadTooLarge("request body is too large".to_string());
    }

    let reason = InvalidPrompt::MalformedBody(rejection.body_text());
    tracing::warn!(%reason, "Rejected generate request");
    RelayError::from(reason).into()
}
