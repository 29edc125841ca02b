//! 搜索过滤
//!
//! 查询词去除空白并转小写后，在 title / tech / description 中做子串匹配

use super::Project;

/// 单条记录是否匹配查询（空查询匹配全部）
pub fn matches(project: &Project, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty() || matches_normalized(project, &q)
}

/// 过滤列表，保持原有顺序
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return projects.iter().collect();
    }
    projects
        .iter()
        .filter(|p| matches_normalized(p, &q))
        .collect()
}

fn matches_normalized(project: &Project, q: &str) -> bool {
    [&project.title, &project.tech, &project.description]
        .iter()
        .any(|field| field.to_lowercase().contains(q))
}
