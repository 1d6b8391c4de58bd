//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod admin_handler;
pub mod log_handler;
pub mod student_handler;

pub use admin_handler::*;
pub use log_handler::*;
pub use student_handler::*;
