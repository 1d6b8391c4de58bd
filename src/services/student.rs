//! 学生服务
//!
//! 提供学生名册的增删改查。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{Student, StudentDraft, StudentUpdate};
use crate::storage::StudentStore;

/// 学生服务 trait
#[async_trait]
pub trait StudentService: Send + Sync {
    /// 新增学生
    async fn add(&self, draft: StudentDraft) -> Result<Student>;

    /// 修改学生，未提供的字段保持不变
    async fn edit(&self, id: u64, update: StudentUpdate) -> Result<Student>;

    /// 删除学生，不存在时静默返回
    async fn delete(&self, id: u64) -> Result<usize>;

    /// 列出全部学生
    async fn list(&self) -> Result<Vec<Student>>;
}

/// 学生服务实现
pub struct StudentServiceImpl {
    store: Arc<StudentStore>,
    unique_register_no: bool,
}

impl StudentServiceImpl {
    /// 创建新的服务实例
    pub fn new(store: Arc<StudentStore>, unique_register_no: bool) -> Self {
        Self {
            store,
            unique_register_no,
        }
    }
}

/// 学号是否已被其他学生占用
fn ensure_register_no_free(
    records: &[Student],
    register_no: Option<&str>,
    except_id: Option<u64>,
) -> Result<()> {
    let Some(register_no) = register_no else {
        return Ok(());
    };
    let taken = records
        .iter()
        .filter(|s| except_id.is_none() || s.id() != except_id)
        .any(|s| s.register_no().as_deref() == Some(register_no));
    if taken {
        return Err(AppError::Conflict(format!(
            "Register number already in use: {}",
            register_no
        )));
    }
    Ok(())
}

#[async_trait]
impl StudentService for StudentServiceImpl {
    async fn add(&self, draft: StudentDraft) -> Result<Student> {
        let unique = self.unique_register_no;
        let student = self
            .store
            .append_checked(Student::from_draft(draft), move |records, candidate| {
                if unique {
                    ensure_register_no_free(records, candidate.register_no().as_deref(), None)?;
                }
                Ok(())
            })
            .await?;

        info!("Student added: id={}", student.id().unwrap_or_default());
        Ok(student)
    }

    async fn edit(&self, id: u64, update: StudentUpdate) -> Result<Student> {
        if update.is_empty() {
            debug!("Editing student {} with no fields supplied", id);
        }
        let unique = self.unique_register_no;
        let updated = self
            .store
            .update(id, move |student, records| {
                if unique {
                    ensure_register_no_free(records, update.register_no.as_deref(), Some(id))?;
                }
                student.apply(update);
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        info!("Student updated: id={}", id);
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<usize> {
        let removed = self.store.delete(id).await?;
        info!("Student delete requested: id={}, removed={}", id, removed);
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<Student>> {
        self.store.load().await
    }
}

/// 创建学生服务
pub fn create_student_service(
    store: Arc<StudentStore>,
    unique_register_no: bool,
) -> Box<dyn StudentService> {
    Box::new(StudentServiceImpl::new(store, unique_register_no))
}
