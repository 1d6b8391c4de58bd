use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::*},
    error::AppError,
    services::Movement,
};

pub async fn record_movement(
    State(state): State<AppState>,
    request: Result<Json<MovementRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;
    debug!(
        "Recording {} for student: {}",
        request.kind, request.student_id
    );

    let log = state
        .log_service
        .record_movement(Movement {
            student_id: request.student_id,
            kind: request.kind,
            status: request.status,
            at: Utc::now(),
        })
        .await?;
    state.metrics.record_movement();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(LogPayload { log }).with_message("Movement recorded")),
    ))
}
