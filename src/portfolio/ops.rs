//! 列表变换
//!
//! 每个操作接收当前列表并返回新列表，不修改输入；找不到目标 ID 时返回 None

use super::{Project, ProjectId};

/// 新记录放在最前面（最新优先）
pub fn prepend(projects: &[Project], project: Project) -> Vec<Project> {
    let mut next = Vec::with_capacity(projects.len() + 1);
    next.push(project);
    next.extend(projects.iter().cloned());
    next
}

/// 原位替换，保持顺序
pub fn replace(projects: &[Project], id: &ProjectId, project: Project) -> Option<Vec<Project>> {
    let index = position(projects, id)?;
    let mut next = projects.to_vec();
    next[index] = project;
    Some(next)
}

pub fn remove(projects: &[Project], id: &ProjectId) -> Option<Vec<Project>> {
    position(projects, id)?;
    Some(projects.iter().filter(|p| &p.id != id).cloned().collect())
}

pub fn toggle_featured(projects: &[Project], id: &ProjectId) -> Option<Vec<Project>> {
    let index = position(projects, id)?;
    let mut next = projects.to_vec();
    next[index].featured = !next[index].featured;
    Some(next)
}

fn position(projects: &[Project], id: &ProjectId) -> Option<usize> {
    projects.iter().position(|p| &p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::ProjectDraft;
    use serde_json::Map;

    fn project(id: i64, title: &str) -> Project {
        ProjectDraft::new(title)
            .into_project(ProjectId::from(id), Map::new())
            .unwrap()
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let list = vec![project(1, "old")];
        let next = prepend(&list, project(2, "new"));

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].title, "new");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_replace_keeps_order() {
        let list = vec![project(1, "a"), project(2, "b"), project(3, "c")];
        let next = replace(&list, &ProjectId::from(2), project(2, "B")).unwrap();

        let titles: Vec<&str> = next.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "B", "c"]);
        assert!(replace(&list, &ProjectId::from(9), project(9, "x")).is_none());
    }

    #[test]
    fn test_remove_and_toggle() {
        let list = vec![project(1, "a"), project(2, "b")];

        let removed = remove(&list, &ProjectId::from(1)).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, ProjectId::from(2));
        assert!(remove(&list, &ProjectId::from(5)).is_none());

        let toggled = toggle_featured(&list, &ProjectId::from(2)).unwrap();
        assert!(toggled[1].featured);
        assert!(!list[1].featured);
        assert!(toggle_featured(&list, &ProjectId::from(5)).is_none());
    }
}
