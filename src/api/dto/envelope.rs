//! 状态信封
//!
//! 所有成功响应形如 `{"status": "success", "message"?: ..., <payload>}`。

use serde::Serialize;

/// 成功响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// 固定为 "success"
    pub status: &'static str,
    /// 提示消息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 业务数据，平铺到顶层
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(payload: T) -> Self {
        Self {
            status: "success",
            message: None,
            payload,
        }
    }

    /// 添加提示消息
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

/// 无业务数据
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 仅带消息的成功响应
    pub fn message(message: &str) -> Self {
        Self::success(Empty {}).with_message(message)
    }
}
