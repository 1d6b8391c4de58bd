//! 数据模型模块
//!
//! 定义学生与出入日志两类记录。

use serde::{Serialize, de::DeserializeOwned};

pub mod log_entry;
pub mod student;
pub mod text;

pub use log_entry::{LogEntry, MovementKind};
pub use student::{Student, StudentDraft, StudentUpdate};

/// 可存入集合的记录
///
/// 记录以整数 `id` 标识，`id` 由存储层在追加时分配。
/// 外部写入的记录可能没有 `id`，此时不参与按 ID 的查找与分配。
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 记录 ID
    fn id(&self) -> Option<u64>;

    /// 设置记录 ID
    fn set_id(&mut self, id: u64);
}
