// Student Portfolio - Library Root
//
// 本地项目集管理：键值存储同步、JSON 导入导出、搜索

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod portfolio;
pub mod storage;
pub mod transfer;
pub mod utils;

// 重新导出常用类型
pub use config::PortfolioConfig;
pub use error::PortfolioError;
pub use portfolio::{PortfolioStore, Project, ProjectDraft, ProjectId, Student};
pub use transfer::{ExportDocument, ImportMode, ImportSummary};
