//! 学生 DTO

use serde::Serialize;

use crate::models::Student;

/// 学生列表响应数据
#[derive(Debug, Serialize)]
pub struct StudentsPayload {
    pub students: Vec<Student>,
}
