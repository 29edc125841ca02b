//! 项目存储
//!
//! 持有内存中的项目列表与学生信息，并与键值存储中的整块 JSON 保持同步。
//! 每次变更都会完整序列化列表并覆盖写入，不做增量写。

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::ids::{collect_ids, IdGenerator};
use super::{ops, Project, ProjectDraft, ProjectId, Student};
use crate::error::{PortfolioError, Result};
use crate::storage::KeyValueStore;
use crate::transfer::{
    parse_import, parse_records, reconcile, ExportDocument, ImportMode, ImportSummary,
};

/// 默认存储键
pub const STORAGE_KEY: &str = "student_portfolio_v1";

/// 加载结果
#[derive(Debug)]
pub enum LoadOutcome {
    /// 首次运行，已写入示例项目
    Seeded,
    /// 从存储恢复
    Restored { count: usize },
    /// 数据损坏，列表置空（存储内容保持原样，直到下一次变更）
    Corrupt(PortfolioError),
}

pub struct PortfolioStore<S: KeyValueStore> {
    backend: S,
    key: String,
    projects: Vec<Project>,
    student: Student,
    ids: IdGenerator,
}

impl<S: KeyValueStore> PortfolioStore<S> {
    /// 创建空的存储对象（尚未加载）
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            projects: Vec::new(),
            student: Student::default(),
            ids: IdGenerator::new(),
        }
    }

    pub fn with_student(mut self, student: Student) -> Self {
        self.student = student;
        self
    }

    /// 创建并立即加载
    pub fn open(backend: S, key: impl Into<String>) -> Result<(Self, LoadOutcome)> {
        let mut store = Self::new(backend, key);
        let outcome = store.load()?;
        Ok((store, outcome))
    }

    // ═══════════════════════════════════════════════════════════════════
    // 加载 / 保存
    // ═══════════════════════════════════════════════════════════════════

    /// 启动时读取存储
    ///
    /// 只有存储后端本身读写失败才返回 Err；数据损坏通过 `LoadOutcome::Corrupt` 报告
    pub fn load(&mut self) -> Result<LoadOutcome> {
        let raw = match self.backend.get(&self.key)? {
            Some(raw) => raw,
            None => {
                let seed = Project::sample(
                    self.ids.next_unique(&Default::default()),
                    Utc::now().year(),
                );
                self.commit(vec![seed])?;
                info!(key = %self.key, "no saved projects, seeded sample project");
                return Ok(LoadOutcome::Seeded);
            }
        };

        // 与导入共用逐条解析：缺失 ID 的记录补发 ID，而不是整块判为损坏
        let parsed = serde_json::from_str::<Value>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|value| match value {
                Value::Array(items) => parse_records(&items).map_err(|e| match e {
                    PortfolioError::ImportFormat(reason) => reason,
                    other => other.to_string(),
                }),
                _ => Err("expected a JSON array of projects".to_string()),
            });
        let incoming = match parsed {
            Ok(incoming) => incoming,
            Err(reason) => {
                let err = PortfolioError::PersistedDataCorrupt {
                    key: self.key.clone(),
                    reason,
                };
                warn!(error = %err, "failed to parse saved projects");
                self.projects = Vec::new();
                return Ok(LoadOutcome::Corrupt(err));
            }
        };

        // 手工编辑过的数据可能含重复或缺失的 ID
        let count = incoming.len();
        let (projects, summary) = reconcile(&[], incoming, ImportMode::Replace, &mut self.ids);
        if summary.reassigned > 0 || summary.assigned > 0 {
            warn!(
                assigned = summary.assigned,
                reassigned = summary.reassigned,
                "saved projects had missing or duplicate ids, re-assigned"
            );
            self.commit(projects)?;
        } else {
            self.projects = projects;
        }

        debug!(key = %self.key, count, "loaded projects");
        Ok(LoadOutcome::Restored { count })
    }

    /// 将当前列表完整写回存储
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.projects)?;
        self.backend.set(&self.key, &json)
    }

    /// 先持久化新列表，成功后再替换内存状态
    fn commit(&mut self, next: Vec<Project>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.backend.set(&self.key, &json)?;
        debug!(key = %self.key, count = next.len(), "saved projects");
        self.projects = next;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // 查询
    // ═══════════════════════════════════════════════════════════════════

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    /// 按显示文本查找 ID（CLI 参数使用）
    pub fn find_id(&self, text: &str) -> Option<ProjectId> {
        self.projects
            .iter()
            .find(|p| p.id.to_string() == text)
            .map(|p| p.id.clone())
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    // ═══════════════════════════════════════════════════════════════════
    // 变更操作
    // ═══════════════════════════════════════════════════════════════════

    /// 新增项目，返回分配的 ID
    pub fn add(&mut self, draft: ProjectDraft) -> Result<ProjectId> {
        draft.validate()?;
        let id = self.ids.next_unique(&collect_ids(&self.projects));
        let project = draft.into_project(id.clone(), Default::default())?;
        let next = ops::prepend(&self.projects, project);
        self.commit(next)?;
        info!(id = %id, "added project");
        Ok(id)
    }

    /// 按 ID 原位替换；不存在时返回 false 且不写存储
    pub fn update(&mut self, id: &ProjectId, draft: ProjectDraft) -> Result<bool> {
        draft.validate()?;
        let Some(existing) = self.get(id) else {
            return Ok(false);
        };
        let project = draft.into_project(id.clone(), existing.extra.clone())?;
        match ops::replace(&self.projects, id, project) {
            Some(next) => {
                self.commit(next)?;
                info!(id = %id, "updated project");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 删除（确认由调用方负责）
    pub fn delete(&mut self, id: &ProjectId) -> Result<bool> {
        match ops::remove(&self.projects, id) {
            Some(next) => {
                self.commit(next)?;
                info!(id = %id, "deleted project");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn toggle_featured(&mut self, id: &ProjectId) -> Result<bool> {
        match ops::toggle_featured(&self.projects, id) {
            Some(next) => {
                self.commit(next)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 整体替换列表（导入使用）
    pub fn replace_projects(&mut self, projects: Vec<Project>) -> Result<()> {
        self.commit(projects)
    }

    /// 清空列表并写入空数组（之后加载得到空列表，不会重新写入示例）
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())?;
        info!(key = %self.key, "cleared saved projects");
        Ok(())
    }

    /// 学生信息只保存在内存中
    pub fn set_student_name(&mut self, name: impl Into<String>) {
        self.student.name = name.into();
    }

    pub fn set_student_course(&mut self, course: impl Into<String>) {
        self.student.course = course.into();
    }

    // ═══════════════════════════════════════════════════════════════════
    // 导入 / 导出
    // ═══════════════════════════════════════════════════════════════════

    /// 导入 JSON 文档；格式错误时不修改任何状态
    pub fn import_str(&mut self, raw: &str, mode: ImportMode) -> Result<ImportSummary> {
        let incoming = match parse_import(raw) {
            Ok(incoming) => incoming,
            Err(e) => {
                warn!(error = %e, "import rejected");
                return Err(e);
            }
        };
        let (next, summary) = reconcile(&self.projects, incoming, mode, &mut self.ids);
        self.commit(next)?;
        info!(
            mode = %summary.mode,
            imported = summary.imported,
            reassigned = summary.reassigned,
            total = summary.total,
            "import completed"
        );
        Ok(summary)
    }

    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(self.student.clone(), self.projects.clone(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn persisted(store: &PortfolioStore<MemoryStore>) -> Vec<Project> {
        let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft::new(title)
    }

    #[test]
    fn test_seed_once() {
        let (store, outcome) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();

        assert!(matches!(outcome, LoadOutcome::Seeded));
        assert_eq!(store.projects().len(), 1);
        assert_eq!(store.projects()[0].title, "Sample Project");
        assert!(store.projects()[0].featured);
        assert_eq!(persisted(&store), store.projects());

        // 再次加载不会重复写入示例
        let backend = store.backend().clone();
        let (reloaded, outcome) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();
        assert!(matches!(outcome, LoadOutcome::Restored { count: 1 }));
        assert_eq!(reloaded.projects(), store.projects());
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let backend = MemoryStore::with_entry(STORAGE_KEY, "{not json");
        let (store, outcome) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();

        assert!(matches!(
            outcome,
            LoadOutcome::Corrupt(PortfolioError::PersistedDataCorrupt { .. })
        ));
        assert!(store.projects().is_empty());
        assert_eq!(
            store.backend().get(STORAGE_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_load_repairs_duplicate_ids() {
        let backend = MemoryStore::with_entry(
            STORAGE_KEY,
            r#"[{"id": 1, "title": "a"}, {"id": 1, "title": "b"}]"#,
        );
        let (store, _) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();

        let ids: HashSet<_> = store.projects().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.projects()[0].id, ProjectId::from(1));
        assert_eq!(persisted(&store), store.projects());
    }

    #[test]
    fn test_load_assigns_missing_ids() {
        let backend = MemoryStore::with_entry(
            STORAGE_KEY,
            r#"[{"id": 1, "title": "keep"}, {"title": "no id"}]"#,
        );
        let (store, outcome) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();

        assert!(matches!(outcome, LoadOutcome::Restored { count: 2 }));
        assert_eq!(store.projects()[0].id, ProjectId::from(1));
        assert_eq!(store.projects()[1].title, "no id");
        assert_ne!(store.projects()[1].id, ProjectId::from(1));
        // 补发的 ID 立即写回
        assert_eq!(persisted(&store), store.projects());
    }

    #[test]
    fn test_load_rejects_non_array_blob() {
        let backend = MemoryStore::with_entry(STORAGE_KEY, r#"{"projects": []}"#);
        let (store, outcome) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();

        assert!(matches!(outcome, LoadOutcome::Corrupt(_)));
        assert!(store.projects().is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();

        let a = store.add(draft("A")).unwrap();
        let b = store.add(draft("B")).unwrap();
        let c = store.add(draft("C")).unwrap();

        let mut edited = draft("B2");
        edited.tech = "Rust".to_string();
        assert!(store.update(&b, edited).unwrap());
        assert!(store.toggle_featured(&a).unwrap());
        assert!(store.delete(&c).unwrap());

        let titles: Vec<&str> = store.projects().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B2", "A", "Sample Project"]);
        assert!(store.get(&a).unwrap().featured);
        assert_eq!(persisted(&store), store.projects());
    }

    #[test]
    fn test_unique_ids_on_add() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();

        let ids: Vec<ProjectId> = (0..50)
            .map(|i| store.add(draft(&format!("p{}", i))).unwrap())
            .collect();
        let unique: HashSet<_> = ids.into_iter().collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(store.projects().len(), 51);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        let before = store.projects().to_vec();
        let missing = ProjectId::from("nope");

        assert!(!store.update(&missing, draft("x")).unwrap());
        assert!(!store.delete(&missing).unwrap());
        assert!(!store.toggle_featured(&missing).unwrap());
        assert_eq!(store.projects(), before.as_slice());
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();

        let err = store.add(draft("  ")).unwrap_err();
        assert!(matches!(err, PortfolioError::EmptyTitle));
        assert_eq!(store.projects().len(), 1);
    }

    #[test]
    fn test_update_keeps_extra_fields() {
        let backend = MemoryStore::with_entry(
            STORAGE_KEY,
            r#"[{"id": 5, "title": "a", "stars": 3}]"#,
        );
        let (mut store, _) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();

        let id = ProjectId::from(5);
        assert!(store.update(&id, draft("renamed")).unwrap());
        assert_eq!(store.get(&id).unwrap().extra["stars"], serde_json::json!(3));
    }

    #[test]
    fn test_clear_empties_everything() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        store.add(draft("A")).unwrap();

        store.clear().unwrap();
        assert!(store.projects().is_empty());
        assert_eq!(
            store.backend().get(STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );

        // 清空后重新加载仍为空，不会再次写入示例
        let (reloaded, outcome) =
            PortfolioStore::open(store.backend().clone(), STORAGE_KEY).unwrap();
        assert!(matches!(outcome, LoadOutcome::Restored { count: 0 }));
        assert!(reloaded.projects().is_empty());
    }

    #[test]
    fn test_save_overwrites_external_changes() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        store.backend.set(STORAGE_KEY, "[]").unwrap();

        store.save().unwrap();
        assert_eq!(persisted(&store), store.projects());
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_replace_projects_persists() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        let replacement = vec![ProjectDraft::new("Only")
            .into_project(ProjectId::from(77), Default::default())
            .unwrap()];

        store.replace_projects(replacement.clone()).unwrap();
        assert_eq!(store.projects(), replacement.as_slice());
        assert_eq!(persisted(&store), replacement);
    }

    #[test]
    fn test_import_through_store() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        let before = store.projects().to_vec();

        let err = store
            .import_str(r#"{"notprojects": []}"#, ImportMode::Merge)
            .unwrap_err();
        assert!(matches!(err, PortfolioError::ImportFormat(_)));
        assert_eq!(store.projects(), before.as_slice());
        assert_eq!(persisted(&store), before);

        let summary = store
            .import_str(
                r#"{"projects": [{"title": "x"}, {"title": "y"}]}"#,
                ImportMode::Merge,
            )
            .unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(store.projects()[0], before[0]);
        assert_eq!(persisted(&store), store.projects());

        let summary = store
            .import_str(r#"{"projects": [{"title": "z"}]}"#, ImportMode::Replace)
            .unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(store.projects()[0].title, "z");
    }

    #[test]
    fn test_export_uses_current_state() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        store.set_student_name("Ada");
        store.set_student_course("BSc");

        let doc = store.export(Utc::now());
        assert_eq!(doc.student.name, "Ada");
        assert_eq!(doc.student.course, "BSc");
        assert_eq!(doc.projects, store.projects());
    }

    #[test]
    fn test_student_is_not_persisted() {
        let (mut store, _) = PortfolioStore::open(MemoryStore::new(), STORAGE_KEY).unwrap();
        store.set_student_name("Ada");
        store.add(draft("A")).unwrap();

        assert_eq!(store.student().name, "Ada");
        let (reloaded, _) = PortfolioStore::open(store.backend().clone(), STORAGE_KEY).unwrap();
        assert_eq!(reloaded.student(), &Student::default());
    }

    #[test]
    fn test_file_backed_store() {
        let temp = TempDir::new().unwrap();
        let (mut store, _) =
            PortfolioStore::open(FileStore::new(temp.path()), STORAGE_KEY).unwrap();
        let id = store.add(draft("On disk")).unwrap();

        let (reloaded, _) =
            PortfolioStore::open(FileStore::new(temp.path()), STORAGE_KEY).unwrap();
        assert_eq!(reloaded.get(&id).unwrap().title, "On disk");
        assert_eq!(reloaded.find_id(&id.to_string()), Some(id));
    }

    #[test]
    fn test_find_id_matches_display_text() {
        let backend = MemoryStore::with_entry(STORAGE_KEY, r#"[{"id": "abc", "title": "t"}]"#);
        let (store, _) = PortfolioStore::open(backend, STORAGE_KEY).unwrap();

        assert_eq!(store.find_id("abc"), Some(ProjectId::from("abc")));
        assert_eq!(store.find_id("zzz"), None);
    }
}
