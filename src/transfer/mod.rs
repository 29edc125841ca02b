//! 导入 / 导出
//!
//! - 导出：`{ student, projects, exportedAt }` 文档及文件名
//! - 导入：解析外部文档，按 replace / merge 模式与现有列表合并

pub mod export;
pub mod import;

pub use export::*;
pub use import::*;

use std::fmt;
use std::str::FromStr;

/// 导入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// 丢弃现有列表，完全使用导入内容
    Replace,
    /// 追加导入内容，不删除也不覆盖现有记录
    #[default]
    Merge,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            other => Err(format!("unknown import mode: {}", other)),
        }
    }
}
