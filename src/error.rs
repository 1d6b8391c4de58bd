//! 错误处理模块
//!
//! 定义应用程序的错误类型，以及错误到状态信封响应的映射。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 认证错误（凭据或登录信息不匹配）
    #[error("认证失败: {0}")]
    Authentication(String),

    /// 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 存储错误（快照不可读、不可写或内容损坏）
    #[error("存储错误: {0}")]
    Storage(String),

    /// 参数验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 唯一性冲突
    #[error("数据冲突: {0}")]
    Conflict(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),
}

impl AppError {
    /// 返回给客户端的简短消息
    ///
    /// 客户端错误直接回显原因；服务端错误只给出笼统的描述，细节写入日志。
    pub fn client_message(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Storage(_) | AppError::Serialization(_) => "Storage unavailable".to_string(),
            AppError::Config(_) => "Internal server error".to_string(),
        }
    }

    /// HTTP 状态码映射
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(ErrorResponse::new(&self.client_message()))).into_response()
    }
}

/// 错误响应
///
/// 与成功响应共用 `status` 字段，客户端只需检查 `status == "error"`。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 固定为 "error"
    pub status: String,
    /// 错误消息
    pub message: String,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: message.to_string(),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
