//! 项目 ID 生成
//!
//! 以毫秒时间戳为基础，进程内严格递增，并跳过目标列表中已存在的值

use chrono::Utc;
use std::collections::HashSet;

use super::ProjectId;

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成一个不在 `taken` 中的新 ID
    pub fn next_unique(&mut self, taken: &HashSet<ProjectId>) -> ProjectId {
        loop {
            let candidate = self.next_raw();
            let id = ProjectId::from(candidate);
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    fn next_raw(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// 收集列表中已使用的 ID
pub fn collect_ids<'a, I>(projects: I) -> HashSet<ProjectId>
where
    I: IntoIterator<Item = &'a super::Project>,
{
    projects.into_iter().map(|p| p.id.clone()).collect()
}
