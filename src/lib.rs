//! Hostel - 学生名册与出入日志记录服务
//!
//! 管理员维护学生名册并查看出入日志，学生登录后查看本人日志。
//! 两个集合各自保存为一份 JSON 快照，每次请求整体读取，写操作整体覆盖。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
