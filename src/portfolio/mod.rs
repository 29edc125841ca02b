//! 项目集管理模块
//!
//! - models: 项目记录与学生信息
//! - ids: ID 生成
//! - ops: 纯函数式列表变换
//! - filter: 搜索
//! - store: 与键值存储同步的仓库对象

pub mod filter;
pub mod ids;
pub mod models;
pub mod ops;
pub mod store;

// 重导出
pub use filter::{filter_projects, matches};
pub use ids::IdGenerator;
pub use models::*;
pub use store::{LoadOutcome, PortfolioStore, STORAGE_KEY};
