//! Student Routes
//!
//! 学生登录与本人日志查询。

use crate::api::handlers::student_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建学生路由器
pub fn create_student_router() -> Router<AppState> {
    Router::new()
        .route("/student/login", post(student_login))
        .route("/student/logout", get(student_logout))
        .route("/my_logs", get(my_logs))
}
