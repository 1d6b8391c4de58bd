//! Admin Routes
//!
//! 管理员登录、学生名册维护与日志查看。

use crate::api::handlers::admin_handler::*;
use crate::api::handlers::log_handler::record_movement;
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::app_state::AppState;

/// 创建管理员路由器
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin_login))
        .route("/logout", get(admin_logout))
        .route("/add_student", post(add_student))
        .route("/edit_student/:id", post(edit_student))
        .route("/delete_student/:id", delete(delete_student))
        .route("/students", get(list_students))
        .route("/view_logs", get(view_logs))
        .route("/log_movement", post(record_movement))
}
