use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::*},
    error::AppError,
};

pub async fn student_login(
    State(state): State<AppState>,
    request: Result<Json<StudentLoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;
    debug!("Student login attempt: {:?}", request.name);

    let student = state
        .auth_service
        .authenticate_student(request.name.as_deref(), request.register_no.as_deref())
        .await
        .inspect_err(|_| state.metrics.record_login_rejected())?;

    Ok(Json(
        ApiResponse::success(StudentPayload { student }).with_message("Student logged in"),
    ))
}

pub async fn student_logout() -> impl IntoResponse {
    Json(ApiResponse::message("Student logged out"))
}

pub async fn my_logs(
    State(state): State<AppState>,
    params: Result<Query<MyLogsParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let student_id = params.student_id()?;
    debug!("Listing logs for student: {}", student_id);

    let logs = state.log_service.list_for_student(student_id).await?;

    Ok(Json(ApiResponse::success(LogsPayload { logs })))
}
