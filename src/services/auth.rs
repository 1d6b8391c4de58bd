//! 认证服务
//!
//! 管理员凭据与配置中的常量比较；学生以姓名加学号在名册中匹配。
//! 不签发令牌，也不维护会话。

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::error::{AppError, Result};
use crate::models::Student;
use crate::storage::StudentStore;

/// 管理员身份
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}

/// 认证服务 trait
#[async_trait]
pub trait AuthService: Send + Sync {
    /// 管理员登录
    fn authenticate_admin(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<AdminIdentity>;

    /// 学生登录，返回匹配的学生记录
    async fn authenticate_student(
        &self,
        name: Option<&str>,
        register_no: Option<&str>,
    ) -> Result<Student>;
}

/// 认证服务实现
pub struct AuthServiceImpl {
    admin: AdminConfig,
    students: Arc<StudentStore>,
}

impl AuthServiceImpl {
    pub fn new(admin: AdminConfig, students: Arc<StudentStore>) -> Self {
        Self { admin, students }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    fn authenticate_admin(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<AdminIdentity> {
        if username == Some(self.admin.username.as_str())
            && password == Some(self.admin.password.as_str())
        {
            info!("Admin logged in: {}", self.admin.username);
            return Ok(AdminIdentity {
                username: self.admin.username.clone(),
            });
        }

        warn!("Admin login rejected for username {:?}", username);
        Err(AppError::Authentication("Invalid credentials".to_string()))
    }

    async fn authenticate_student(
        &self,
        name: Option<&str>,
        register_no: Option<&str>,
    ) -> Result<Student> {
        let student = self
            .students
            .find_first(|s| s.matches_credentials(name, register_no))
            .await?;

        match student {
            Some(student) => {
                info!("Student logged in: id={:?}", student.id());
                Ok(student)
            }
            None => {
                warn!("Student login rejected for name {:?}", name);
                Err(AppError::NotFound("Student not found".to_string()))
            }
        }
    }
}

/// 创建认证服务
pub fn create_auth_service(
    admin: AdminConfig,
    students: Arc<StudentStore>,
) -> Box<dyn AuthService> {
    Box::new(AuthServiceImpl::new(admin, students))
}
