//! 快照介质
//!
//! 一个集合对应一份完整快照：读取时整体反序列化，写入时整体覆盖。
//! 写入不是原子的，中途失败会留下截断的文件。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::Record;

/// 快照存储 trait
#[async_trait]
pub trait SnapshotStore<T: Record>: Send + Sync {
    /// 初始化：快照不存在时写入空集合
    async fn init(&self) -> Result<()>;

    /// 读取整个集合
    async fn load(&self) -> Result<Vec<T>>;

    /// 覆盖整个集合
    async fn save(&self, records: &[T]) -> Result<()>;

    /// 读取持久化的下一个 ID
    async fn load_counter(&self) -> Result<Option<u64>>;

    /// 持久化下一个 ID
    async fn save_counter(&self, next_id: u64) -> Result<()>;

    /// 介质描述（用于日志）
    fn describe(&self) -> String;
}

/// ID 计数器的持久化格式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterMeta {
    pub next_id: u64,
}

/// JSON 文件快照
///
/// 集合写成带缩进的 JSON 数组；计数器写在同目录的 `<stem>.meta.json`。
pub struct JsonFileSnapshot<T> {
    path: PathBuf,
    meta_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileSnapshot<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let meta_path = path.with_extension("meta.json");
        Self {
            path,
            meta_path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    fn storage_error(&self, action: &str, e: impl std::fmt::Display) -> AppError {
        AppError::Storage(format!("{} {}: {}", action, self.path.display(), e))
    }

    async fn write_pretty<V: Serialize + ?Sized>(&self, path: &Path, value: &V) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|e| self.storage_error("encode", e))?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| self.storage_error("write", e))
    }
}

#[async_trait]
impl<T: Record> SnapshotStore<T> for JsonFileSnapshot<T> {
    async fn init(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error("create directory for", e))?;
        }

        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Initializing empty snapshot: {}", self.path.display());
                self.write_pretty(&self.path, &Vec::<T>::new()).await
            }
            Err(e) => Err(self.storage_error("stat", e)),
        }
    }

    async fn load(&self) -> Result<Vec<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.init().await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.storage_error("read", e)),
        };

        let records: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|e| self.storage_error("malformed snapshot", e))?;
        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        self.write_pretty(&self.path, records).await?;
        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    async fn load_counter(&self) -> Result<Option<u64>> {
        match tokio::fs::read(&self.meta_path).await {
            Ok(bytes) => {
                let meta: CounterMeta = serde_json::from_slice(&bytes)
                    .map_err(|e| self.storage_error("malformed counter for", e))?;
                Ok(Some(meta.next_id))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.storage_error("read counter for", e)),
        }
    }

    async fn save_counter(&self, next_id: u64) -> Result<()> {
        self.write_pretty(&self.meta_path, &CounterMeta { next_id })
            .await
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// 内存快照
///
/// 保存序列化后的字节，使读写路径与文件后端一致。
pub struct MemorySnapshot<T> {
    label: String,
    data: Mutex<Option<Vec<u8>>>,
    counter: Mutex<Option<u64>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemorySnapshot<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: Mutex::new(None),
            counter: Mutex::new(None),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> MemorySnapshot<T> {
    /// 用已有记录预置快照
    pub fn with_records(label: impl Into<String>, records: &[T]) -> Result<Self> {
        Ok(Self {
            label: label.into(),
            data: Mutex::new(Some(serde_json::to_vec_pretty(records)?)),
            counter: Mutex::new(None),
            _marker: PhantomData,
        })
    }
}

#[async_trait]
impl<T: Record> SnapshotStore<T> for MemorySnapshot<T> {
    async fn init(&self) -> Result<()> {
        let mut data = self.data.lock().await;
        if data.is_none() {
            *data = Some(serde_json::to_vec_pretty(&Vec::<T>::new())?);
        }
        Ok(())
    }

    async fn load(&self) -> Result<Vec<T>> {
        let mut data = self.data.lock().await;
        let bytes = data.get_or_insert_with(|| b"[]".to_vec());
        serde_json::from_slice(bytes)
            .map_err(|e| AppError::Storage(format!("malformed snapshot {}: {}", self.label, e)))
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        *self.data.lock().await = Some(serde_json::to_vec_pretty(records)?);
        Ok(())
    }

    async fn load_counter(&self) -> Result<Option<u64>> {
        Ok(*self.counter.lock().await)
    }

    async fn save_counter(&self, next_id: u64) -> Result<()> {
        *self.counter.lock().await = Some(next_id);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.label)
    }
}
