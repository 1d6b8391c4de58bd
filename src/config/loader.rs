use crate::config::config::{AppConfig, StorageBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "HOSTEL_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 内置默认值
    /// 2. `HOSTEL_CONFIG` 指定的文件，或 ./config.yaml
    /// 3. `HOSTEL_` 前缀的环境变量，`__` 分隔层级，如 `HOSTEL_SERVER__PORT`
    pub fn load() -> Result<AppConfig, figment::Error> {
        let path = std::env::var("HOSTEL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());
        Self::load_from(path)
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref(), ENV_PREFIX).extract()
    }

    fn figment(path: &Path, env_prefix: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file(path))
            .merge(
                Env::prefixed(env_prefix)
                    .ignore(&["config"])
                    .split("__"),
            )
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.storage.backend == StorageBackend::File
            && (config.storage.students_file.is_empty() || config.storage.logs_file.is_empty())
        {
            return Err(ConfigValidationError::MissingSnapshotFile);
        }

        if config.storage.students_file == config.storage.logs_file {
            return Err(ConfigValidationError::InvalidPath(format!(
                "students and logs share the same file: {}",
                config.storage.students_file
            )));
        }

        if config.admin.username.is_empty() {
            return Err(ConfigValidationError::MissingAdminUsername);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("快照文件名未配置")]
    MissingSnapshotFile,

    #[error("管理员用户名未配置")]
    MissingAdminUsername,

    #[error("配置路径无效: {0}")]
    InvalidPath(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.yaml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_from(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.admin.username, "admin");
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "server:\n  port: 8081\nstorage:\n  data_dir: /srv/hostel\n  unique_register_no: true\nadmin:\n  password: s3cret"
        )
        .unwrap();

        let config = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/hostel"));
        assert!(config.storage.unique_register_no);
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.admin.password, "s3cret");
    }

    #[test]
    fn test_numeric_credentials_from_env() {
        let dir = tempfile::tempdir().unwrap();
        // 独立前缀，避免影响并行运行的其他加载测试
        unsafe {
            std::env::set_var("HOSTEL_NUMERIC_ENV_TEST_ADMIN__PASSWORD", "5678");
            std::env::set_var("HOSTEL_NUMERIC_ENV_TEST_ADMIN__USERNAME", "42");
        }

        let config: AppConfig =
            ConfigLoader::figment(&dir.path().join("absent.yaml"), "HOSTEL_NUMERIC_ENV_TEST_")
                .extract()
                .unwrap();
        assert_eq!(config.admin.password, "5678");
        assert_eq!(config.admin.username, "42");
    }

    #[test]
    fn test_unquoted_numeric_password_in_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "admin:\n  password: 1234\n").unwrap();

        let config = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(config.admin.password, "1234");
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut config = AppConfig::default();
        assert!(ConfigLoader::validate(&config).is_ok());

        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPort)
        ));

        let mut config = AppConfig::default();
        config.storage.logs_file = config.storage.students_file.clone();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPath(_))
        ));

        let mut config = AppConfig::default();
        config.admin.username.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingAdminUsername)
        ));
    }
}
