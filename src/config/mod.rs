//! 分层配置
//!
//! 优先级（高者覆盖低者）：
//! 1. 环境变量（`PORTFOLIO_` 前缀，`__` 分隔层级，如 `PORTFOLIO_STORAGE__DIR`）
//! 2. 项目级 `.portfolio/config.toml`
//! 3. 用户级 `<config_dir>/student-portfolio/config.toml`
//! 4. 内置默认值

mod error;

pub use error::ConfigError;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::portfolio::{Student, STORAGE_KEY};

const APP_DIR: &str = "student-portfolio";
const ENV_PREFIX: &str = "PORTFOLIO_";
const LOCAL_CONFIG: &str = ".portfolio/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub student: Student,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 数据目录；未设置时使用系统数据目录
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// 实际使用的数据目录
    pub fn resolve_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|p| p.join(APP_DIR))
                .ok_or(ConfigError::NoDataDir),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing 过滤表达式，如 `warn` 或 `student_portfolio=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PortfolioConfig {
    /// 从所有来源加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract::<Self>()?.validated()
    }

    /// 构建 figment 提供者链
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // 用户级配置
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // 项目级配置
        let local_path = Path::new(LOCAL_CONFIG);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // 环境变量（最高优先级）；PORTFOLIO_LOG 与 PORTFOLIO_DATA_DIR 由 CLI 单独处理
        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["log", "data_dir"])
                .split("__"),
        )
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let key = self.storage.key.trim();
        if key.is_empty() || key.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "storage.key".to_string(),
                reason: "must be a non-empty name without path separators".to_string(),
            });
        }
        Ok(self)
    }
}
