//! CLI 命令实现
//!
//! 每个命令对应一个用户操作：增删改、标星、搜索、导入导出、清空

pub mod projects;
pub mod render;

pub use projects::*;
pub use render::ProjectRenderer;
