//! 错误类型
//!
//! 库内统一使用 `PortfolioError`，CLI 层再包装为 `anyhow::Error`

use thiserror::Error;

use crate::portfolio::ProjectId;

#[derive(Debug, Error)]
pub enum PortfolioError {
    /// 存储中的数据存在但无法解析（加载时可恢复）
    #[error("Persisted data under '{key}' is corrupt: {reason}")]
    PersistedDataCorrupt { key: String, reason: String },

    /// 导入文件格式错误（不修改任何状态）
    #[error("Invalid file format: {0}")]
    ImportFormat(String),

    /// 提交时标题为空
    #[error("Please provide a project title")]
    EmptyTitle,

    #[error("Project {0} not found")]
    ProjectNotFound(ProjectId),

    /// 存储后端读写失败
    #[error("Storage error on '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize projects: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PortfolioError {
    /// 是否为可恢复错误（用户修正输入后可重试）
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PortfolioError::PersistedDataCorrupt { .. }
                | PortfolioError::ImportFormat(_)
                | PortfolioError::EmptyTitle
                | PortfolioError::ProjectNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
