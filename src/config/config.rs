use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::models::text::deserialize_text;

/// 存储后端类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON 快照文件
    #[default]
    File,
    /// 进程内存（测试或临时演示用）
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// 监听地址
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 后端类型
    pub backend: StorageBackend,
    /// 数据目录
    pub data_dir: PathBuf,
    /// 学生快照文件名
    pub students_file: String,
    /// 日志快照文件名
    pub logs_file: String,
    /// 是否要求学号唯一
    pub unique_register_no: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("."),
            students_file: "students.json".into(),
            logs_file: "logs.json".into(),
            unique_register_no: false,
        }
    }
}

impl StorageConfig {
    /// 学生快照完整路径
    pub fn students_path(&self) -> PathBuf {
        self.data_dir.join(&self.students_file)
    }

    /// 日志快照完整路径
    pub fn logs_path(&self) -> PathBuf {
        self.data_dir.join(&self.logs_file)
    }
}

/// 管理员凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// 用户名
    #[serde(deserialize_with = "deserialize_text")]
    pub username: String,
    /// 密码，环境变量中的纯数字也按文本读取
    #[serde(deserialize_with = "deserialize_text")]
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: "1234".into(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 管理员凭据
    pub admin: AdminConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            admin: AdminConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                ..LoggingConfig::default()
            },
            app_name: "hostel".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.storage.data_dir = PathBuf::from("./data");
        config
    }

    /// 创建测试配置（内存存储）
    pub fn testing() -> Self {
        let mut config = Self::development();
        config.environment = "test".into();
        config.storage.backend = StorageBackend::Memory;
        config
    }
}
