//! 存储层模块
//!
//! 学生与日志各自保存为一份 JSON 快照，支持文件和内存两种介质。

pub mod factory;
pub mod record_store;
pub mod snapshot;

pub use factory::{LogStore, StorageFactory, Stores, StudentStore};
pub use record_store::{IdSequence, LockedStore, RecordStore};
pub use snapshot::{JsonFileSnapshot, MemorySnapshot, SnapshotStore};
