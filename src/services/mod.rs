//! 服务模块

pub mod auth;
pub mod log;
pub mod student;

pub use auth::{AdminIdentity, AuthService, create_auth_service};
pub use log::{LogService, Movement, create_log_service};
pub use student::{StudentService, create_student_service};
