use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::*, extract::FormFields},
    error::AppError,
};

/// 路径中的学生 ID 不是整数时按找不到处理
fn student_id_from_path(path: Result<Path<u64>, PathRejection>) -> Result<u64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound("Student not found".to_string()))
}

pub async fn admin_login(
    State(state): State<AppState>,
    request: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;
    debug!("Admin login attempt: {:?}", request.username);

    let admin = state
        .auth_service
        .authenticate_admin(request.username.as_deref(), request.password.as_deref())
        .inspect_err(|_| state.metrics.record_login_rejected())?;

    Ok(Json(
        ApiResponse::success(AdminPayload { admin }).with_message("Admin logged in"),
    ))
}

pub async fn admin_logout() -> impl IntoResponse {
    Json(ApiResponse::message("Admin logged out"))
}

pub async fn add_student(
    State(state): State<AppState>,
    form: FormFields,
) -> Result<impl IntoResponse, AppError> {
    debug!("Adding student");

    let student = state.student_service.add(form.into_draft()).await?;
    state.metrics.record_student_added();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StudentPayload { student }).with_message("Student added")),
    ))
}

pub async fn edit_student(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    form: FormFields,
) -> Result<impl IntoResponse, AppError> {
    let id = student_id_from_path(path)?;
    debug!("Editing student: {}", id);

    let student = state.student_service.edit(id, form.into_update()).await?;

    Ok(Json(
        ApiResponse::success(StudentPayload { student }).with_message("Student updated"),
    ))
}

pub async fn delete_student(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = student_id_from_path(path)?;
    debug!("Deleting student: {}", id);

    let removed = state.student_service.delete(id).await?;
    state.metrics.record_students_deleted(removed);

    Ok(Json(ApiResponse::message("Student deleted")))
}

pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let students = state.student_service.list().await?;
    debug!("Listing {} students", students.len());

    Ok(Json(ApiResponse::success(StudentsPayload { students })))
}

pub async fn view_logs(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let logs = state.log_service.list_all().await?;
    debug!("Listing {} logs", logs.len());

    Ok(Json(ApiResponse::success(LogsPayload { logs })))
}
