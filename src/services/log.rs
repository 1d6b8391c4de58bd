//! 日志服务
//!
//! 读取出入日志，并记录学生的进入与离开。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{LogEntry, MovementKind};
use crate::storage::{LogStore, StudentStore};

/// 出入记录请求
#[derive(Debug, Clone)]
pub struct Movement {
    pub student_id: u64,
    pub kind: MovementKind,
    pub status: Option<String>,
    pub at: DateTime<Utc>,
}

/// 日志服务 trait
#[async_trait]
pub trait LogService: Send + Sync {
    /// 列出全部日志
    async fn list_all(&self) -> Result<Vec<LogEntry>>;

    /// 列出某个学生的日志
    async fn list_for_student(&self, student_id: u64) -> Result<Vec<LogEntry>>;

    /// 记录一次进入或离开
    async fn record_movement(&self, movement: Movement) -> Result<LogEntry>;
}

/// 日志服务实现
pub struct LogServiceImpl {
    logs: Arc<LogStore>,
    students: Arc<StudentStore>,
}

impl LogServiceImpl {
    pub fn new(logs: Arc<LogStore>, students: Arc<StudentStore>) -> Self {
        Self { logs, students }
    }
}

#[async_trait]
impl LogService for LogServiceImpl {
    async fn list_all(&self) -> Result<Vec<LogEntry>> {
        self.logs.load().await
    }

    async fn list_for_student(&self, student_id: u64) -> Result<Vec<LogEntry>> {
        self.logs.filter(|log| log.belongs_to(student_id)).await
    }

    async fn record_movement(&self, movement: Movement) -> Result<LogEntry> {
        let Movement {
            student_id,
            kind,
            status,
            at,
        } = movement;

        // 先锁学生再锁日志，写入完成前学生不会被删除
        let students = self.students.lock().await;
        let student = students
            .load()
            .await?
            .into_iter()
            .find(|s| s.id() == Some(student_id))
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let log = self
            .logs
            .mutate(move |logs, ids| {
                if kind == MovementKind::Exit {
                    // 关闭该学生最近一条未离开的日志
                    if let Some(open) = logs
                        .iter_mut()
                        .rev()
                        .find(|log| log.belongs_to(student_id) && log.is_open())
                    {
                        open.mark_exit(at, status);
                        return Ok(open.clone());
                    }
                }

                let mut log = LogEntry::for_student(ids.allocate()?, &student);
                match kind {
                    MovementKind::Entry => log.mark_entry(at, status),
                    MovementKind::Exit => log.mark_exit(at, status),
                }
                logs.push(log.clone());
                Ok(log)
            })
            .await?;
        drop(students);

        info!(
            "Movement recorded: student_id={}, kind={}, log_id={:?}",
            student_id,
            kind,
            log.id()
        );
        Ok(log)
    }
}

/// 创建日志服务
pub fn create_log_service(logs: Arc<LogStore>, students: Arc<StudentStore>) -> Box<dyn LogService> {
    Box::new(LogServiceImpl::new(logs, students))
}
