//! 导出文档

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::portfolio::{Project, Student};

/// 导出文件名前缀
pub const EXPORT_FILE_PREFIX: &str = "student_portfolio";

/// 导出文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub student: Student,
    pub projects: Vec<Project>,
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
}

impl ExportDocument {
    pub fn new(student: Student, projects: Vec<Project>, now: DateTime<Utc>) -> Self {
        Self {
            student,
            projects,
            exported_at: export_timestamp(now),
        }
    }

    /// 格式化输出（两空格缩进）
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 可排序的 UTC 时间戳，如 `2025-01-02T03:04:05.678Z`
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 导出文件名：取时间戳前 19 位，`:` 与 `T` 替换为 `_`
pub fn export_filename(now: DateTime<Utc>) -> String {
    let stamp: String = export_timestamp(now)
        .chars()
        .take(19)
        .map(|c| if c == ':' || c == 'T' { '_' } else { c })
        .collect();
    format!("{}_{}.json", EXPORT_FILE_PREFIX, stamp)
}
