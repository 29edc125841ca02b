//! 导入解析与合并
//!
//! 文档必须包含 `projects` 数组。任何一条记录解析失败都会拒绝整个导入，
//! 调用方的列表保持不变。

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use super::ImportMode;
use crate::error::{PortfolioError, Result};
use crate::portfolio::ids::{collect_ids, IdGenerator};
use crate::portfolio::{Project, ProjectId};

/// 待导入的记录；`id` 为 None 表示原文档中缺失或为 null
#[derive(Debug, Clone)]
pub struct IncomingProject {
    pub id: Option<ProjectId>,
    record: Project,
}

impl IncomingProject {
    pub fn record(&self) -> &Project {
        &self.record
    }

    fn into_project(self, id: ProjectId) -> Project {
        Project { id, ..self.record }
    }
}

impl From<Project> for IncomingProject {
    fn from(project: Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            record: project,
        }
    }
}

/// 导入结果统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub mode: ImportMode,
    /// 导入的记录数
    pub imported: usize,
    /// 缺少 ID 而新分配的数量
    pub assigned: usize,
    /// ID 冲突而重新分配的数量
    pub reassigned: usize,
    /// 导入后列表总数
    pub total: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Import completed ({}): {} imported, {} new ids, {} re-assigned, {} total",
            self.mode, self.imported, self.assigned, self.reassigned, self.total
        )
    }
}

/// 解析导入文档
pub fn parse_import(raw: &str) -> Result<Vec<IncomingProject>> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| PortfolioError::ImportFormat(format!("failed to parse JSON: {}", e)))?;

    let items = match doc.get("projects") {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(PortfolioError::ImportFormat(
                "no projects array".to_string(),
            ))
        }
    };

    parse_records(items)
}

/// 逐条解析记录；缺失或为 null 的 `id` 留给合并时分配
pub fn parse_records(items: &[Value]) -> Result<Vec<IncomingProject>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect()
}

fn parse_record(index: usize, item: &Value) -> Result<IncomingProject> {
    let Value::Object(fields) = item else {
        return Err(PortfolioError::ImportFormat(format!(
            "project #{} is not an object",
            index
        )));
    };

    let mut fields: Map<String, Value> = fields.clone();
    let id = match fields.remove("id") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(serde_json::from_value::<ProjectId>(raw).map_err(|_| {
            PortfolioError::ImportFormat(format!(
                "project #{} has an id that is neither a number nor a string",
                index
            ))
        })?),
    };

    // 占位 ID，真正的 ID 在合并时确定
    fields.insert("id".to_string(), Value::from(0));
    let record: Project = serde_json::from_value(Value::Object(fields))
        .map_err(|e| PortfolioError::ImportFormat(format!("project #{}: {}", index, e)))?;

    Ok(IncomingProject { id, record })
}

/// 按模式合并导入记录，返回新列表
///
/// - Replace：结果只包含导入记录
/// - Merge：现有记录保持原样，导入记录依次追加
///
/// 两种模式下，缺失 ID 或与已有 ID（含本次已追加的）冲突时都会分配新 ID，
/// 新 ID 同时避开导入文档中出现的所有 ID
pub fn reconcile(
    existing: &[Project],
    incoming: Vec<IncomingProject>,
    mode: ImportMode,
    ids: &mut IdGenerator,
) -> (Vec<Project>, ImportSummary) {
    let (mut next, mut taken) = match mode {
        ImportMode::Replace => (Vec::with_capacity(incoming.len()), HashSet::new()),
        ImportMode::Merge => {
            let mut next = Vec::with_capacity(existing.len() + incoming.len());
            next.extend(existing.iter().cloned());
            (next, collect_ids(existing))
        }
    };

    let mut reserved: HashSet<ProjectId> = taken.clone();
    reserved.extend(incoming.iter().filter_map(|p| p.id.clone()));

    let mut summary = ImportSummary {
        mode,
        imported: incoming.len(),
        assigned: 0,
        reassigned: 0,
        total: 0,
    };

    for item in incoming {
        let id = match &item.id {
            Some(id) if !taken.contains(id) => id.clone(),
            Some(_) => {
                summary.reassigned += 1;
                ids.next_unique(&reserved)
            }
            None => {
                summary.assigned += 1;
                ids.next_unique(&reserved)
            }
        };
        taken.insert(id.clone());
        reserved.insert(id.clone());
        next.push(item.into_project(id));
    }

    summary.total = next.len();
    (next, summary)
}
