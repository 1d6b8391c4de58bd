//! 记录集合
//!
//! 在快照介质之上提供追加、更新、删除和过滤操作。每个集合持有一把互斥锁，
//! 覆盖完整的“读取 - 修改 - 写回”过程以及 ID 分配。

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::Record;
use crate::storage::snapshot::SnapshotStore;

/// ID 序列
///
/// 从持久化计数器恢复，且不低于 `max(现有 id) + 1`，
/// 因此删除之后也不会重复分配旧 ID。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
    issued: bool,
}

fn id_exhausted() -> AppError {
    AppError::Storage("id space exhausted".to_string())
}

impl IdSequence {
    /// 根据计数器和现有记录恢复序列
    pub fn resume<T: Record>(counter: Option<u64>, records: &[T]) -> Result<Self> {
        let after_max = match records.iter().filter_map(Record::id).max() {
            Some(max) => max.checked_add(1).ok_or_else(id_exhausted)?,
            None => 1,
        };
        Ok(Self {
            next: counter.unwrap_or(1).max(after_max),
            issued: false,
        })
    }

    /// 分配一个新 ID
    pub fn allocate(&mut self) -> Result<u64> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or_else(id_exhausted)?;
        self.issued = true;
        Ok(id)
    }

    /// 下一个将被分配的 ID
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// 记录集合
pub struct RecordStore<T: Record> {
    name: &'static str,
    snapshot: Arc<dyn SnapshotStore<T>>,
    lock: Mutex<()>,
}

impl<T: Record> std::fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("name", &self.name)
            .field("snapshot", &self.snapshot.describe())
            .finish()
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new(name: &'static str, snapshot: Arc<dyn SnapshotStore<T>>) -> Self {
        Self {
            name,
            snapshot,
            lock: Mutex::new(()),
        }
    }

    /// 集合名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 初始化快照（不存在则创建空集合）
    pub async fn init(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.snapshot.init().await
    }

    /// 读取整个集合
    pub async fn load(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.snapshot.load().await
    }

    /// 覆盖整个集合
    pub async fn save(&self, records: &[T]) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.snapshot.save(records).await
    }

    /// 在锁内读取、修改并写回整个集合
    ///
    /// 闭包返回错误时不写回。闭包分配过 ID 时同时持久化计数器。
    pub async fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>, &mut IdSequence) -> Result<R> + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.snapshot.load().await?;
        let counter = self.snapshot.load_counter().await?;
        let mut ids = IdSequence::resume(counter, &records)?;

        let result = f(&mut records, &mut ids)?;

        self.snapshot.save(&records).await?;
        if ids.issued {
            self.snapshot.save_counter(ids.peek()).await?;
        }
        Ok(result)
    }

    /// 追加记录并分配 ID，返回创建后的记录
    pub async fn append(&self, record: T) -> Result<T> {
        self.append_checked(record, |_, _| Ok(())).await
    }

    /// 追加前先对现有记录执行检查
    pub async fn append_checked<C>(&self, mut record: T, check: C) -> Result<T>
    where
        C: FnOnce(&[T], &T) -> Result<()> + Send,
    {
        let name = self.name;
        self.mutate(move |records, ids| {
            check(records, &record)?;
            let id = ids.allocate()?;
            record.set_id(id);
            debug!("Appending {} record with id {}", name, id);
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    /// 更新第一条 `id` 匹配的记录
    ///
    /// 找不到时返回 `Ok(None)` 且不写回。闭包拿到的是修改前的完整集合。
    pub async fn update<F>(&self, id: u64, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T, &[T]) -> Result<()> + Send,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.snapshot.load().await?;

        let Some(index) = records.iter().position(|r| r.id() == Some(id)) else {
            return Ok(None);
        };

        let mut updated = records[index].clone();
        f(&mut updated, &records)?;
        records[index] = updated.clone();

        self.snapshot.save(&records).await?;
        Ok(Some(updated))
    }

    /// 删除所有 `id` 匹配的记录，无论是否删除都写回，返回删除数量
    pub async fn delete(&self, id: u64) -> Result<usize> {
        self.mutate(|records, _| {
            let before = records.len();
            records.retain(|r| r.id() != Some(id));
            Ok(before - records.len())
        })
        .await
    }

    /// 线性扫描，保持原有顺序
    pub async fn filter<P>(&self, predicate: P) -> Result<Vec<T>>
    where
        P: Fn(&T) -> bool + Send,
    {
        let records = self.load().await?;
        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }

    /// 第一条匹配的记录
    pub async fn find_first<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool + Send,
    {
        let records = self.load().await?;
        Ok(records.into_iter().find(|r| predicate(r)))
    }

    /// 获取集合锁，在释放前其他读写都会等待
    pub async fn lock(&self) -> LockedStore<'_, T> {
        LockedStore {
            snapshot: self.snapshot.as_ref(),
            _guard: self.lock.lock().await,
        }
    }

    /// 介质描述
    pub fn describe(&self) -> String {
        self.snapshot.describe()
    }
}

/// 持有集合锁期间的只读视图
pub struct LockedStore<'a, T: Record> {
    snapshot: &'a dyn SnapshotStore<T>,
    _guard: MutexGuard<'a, ()>,
}

impl<T: Record> LockedStore<'_, T> {
    /// 读取整个集合
    pub async fn load(&self) -> Result<Vec<T>> {
        self.snapshot.load().await
    }
}
