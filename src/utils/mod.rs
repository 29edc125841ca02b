//! 工具模块
//!
//! 文件读写与 JSON 工具函数

pub mod fs;
pub mod json;

// 重导出
pub use fs::*;
pub use json::*;
