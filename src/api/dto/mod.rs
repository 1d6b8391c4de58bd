//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod auth_dto;
pub mod envelope;
pub mod log_dto;
pub mod student_dto;

pub use auth_dto::*;
pub use envelope::*;
pub use log_dto::*;
pub use student_dto::*;
