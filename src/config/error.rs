//! 配置错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// figment 合并或解析失败
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// 无法确定数据目录
    #[error("Could not determine a data directory; set storage.dir or PORTFOLIO_STORAGE__DIR")]
    NoDataDir,

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}
