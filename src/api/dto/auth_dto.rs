//! 登录 DTO

use serde::{Deserialize, Serialize};

use crate::models::Student;
use crate::models::text::{deserialize_opt_string_only, deserialize_opt_text};
use crate::services::AdminIdentity;

/// 管理员登录请求
///
/// 凭据必须是字符串，数字形式的密码不会匹配。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminLoginRequest {
    #[serde(deserialize_with = "deserialize_opt_string_only")]
    pub username: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_string_only")]
    pub password: Option<String>,
}

/// 管理员登录响应数据
#[derive(Debug, Serialize)]
pub struct AdminPayload {
    pub admin: AdminIdentity,
}

/// 学生登录请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentLoginRequest {
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub name: Option<String>,
    /// 学号，数字也按文本处理
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub register_no: Option<String>,
}

/// 单个学生响应数据
#[derive(Debug, Serialize)]
pub struct StudentPayload {
    pub student: Student,
}
