//! 存储工厂模块
//!
//! 根据配置创建学生与日志两个集合的存储实例。

use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use crate::models::{LogEntry, Record, Student};
use crate::storage::record_store::RecordStore;
use crate::storage::snapshot::{JsonFileSnapshot, MemorySnapshot, SnapshotStore};

/// 学生集合
pub type StudentStore = RecordStore<Student>;

/// 日志集合
pub type LogStore = RecordStore<LogEntry>;

/// 已初始化的存储实例
#[derive(Debug, Clone)]
pub struct Stores {
    pub students: Arc<StudentStore>,
    pub logs: Arc<LogStore>,
}

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建并初始化存储实例
    pub async fn create(config: &StorageConfig) -> Result<Stores> {
        let stores = match config.backend {
            StorageBackend::File => Stores {
                students: Arc::new(file_store("students", config.students_path())),
                logs: Arc::new(file_store("logs", config.logs_path())),
            },
            StorageBackend::Memory => Self::in_memory(),
        };

        stores.students.init().await?;
        stores.logs.init().await?;
        info!(
            "Storage initialized (backend: {}): {}, {}",
            config.backend,
            stores.students.describe(),
            stores.logs.describe()
        );
        Ok(stores)
    }

    /// 创建空的内存存储
    pub fn in_memory() -> Stores {
        Stores {
            students: Arc::new(memory_store("students")),
            logs: Arc::new(memory_store("logs")),
        }
    }

    /// 检查存储是否可用（两个快照都能完整读取）
    pub async fn health_check(stores: &Stores) -> Result<()> {
        stores.students.load().await?;
        stores.logs.load().await?;
        Ok(())
    }
}

fn file_store<T: Record>(name: &'static str, path: std::path::PathBuf) -> RecordStore<T> {
    let snapshot: Arc<dyn SnapshotStore<T>> = Arc::new(JsonFileSnapshot::<T>::new(path));
    RecordStore::new(name, snapshot)
}

fn memory_store<T: Record>(name: &'static str) -> RecordStore<T> {
    let snapshot: Arc<dyn SnapshotStore<T>> = Arc::new(MemorySnapshot::<T>::new(name));
    RecordStore::new(name, snapshot)
}
