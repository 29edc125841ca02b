//! 键值存储后端
//!
//! 以字符串键保存整块 JSON 文本，提供文件实现与内存实现

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// 本地键值存储
///
/// 值总是完整覆盖，不支持增量写入
pub trait KeyValueStore {
    /// 读取键对应的值，不存在时返回 None
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// 覆盖写入
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// 删除键，键不存在时不报错
    fn remove(&mut self, key: &str) -> Result<()>;
}
