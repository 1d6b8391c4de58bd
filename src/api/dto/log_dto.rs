//! 日志 DTO

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{LogEntry, MovementKind};

/// 日志列表响应数据
#[derive(Debug, Serialize)]
pub struct LogsPayload {
    pub logs: Vec<LogEntry>,
}

/// 单条日志响应数据
#[derive(Debug, Serialize)]
pub struct LogPayload {
    pub log: LogEntry,
}

/// 查询本人日志参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MyLogsParams {
    pub student_id: Option<String>,
}

impl MyLogsParams {
    /// 解析学生 ID，缺失或非整数时返回验证错误
    pub fn student_id(&self) -> Result<u64, AppError> {
        let raw = self
            .student_id
            .as_deref()
            .ok_or_else(|| AppError::Validation("student_id is required".to_string()))?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| AppError::Validation(format!("Invalid student_id: {}", raw)))
    }
}

/// 记录出入请求
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub student_id: u64,
    pub kind: MovementKind,
    #[serde(default)]
    pub status: Option<String>,
}
