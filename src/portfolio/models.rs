//! 数据模型
//!
//! 定义 Project, ProjectId, Student, ProjectDraft 等数据结构

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::{PortfolioError, Result};

/// 项目 ID
///
/// 存储格式与历史数据保持一致：时间戳数字（可能带小数部分）或字符串。
/// 整数值的浮点数（如 `5.0`）解析时归一为整数，与 `5` 视为同一 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(Number),
    Text(String),
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ProjectId::Number(normalize_number(n)),
            Raw::Text(s) => ProjectId::Text(s),
        })
    }
}

/// 2^53 以内的整数值浮点数转为整数表示
fn normalize_number(n: Number) -> Number {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

impl From<i64> for ProjectId {
    fn from(value: i64) -> Self {
        ProjectId::Number(Number::from(value))
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        ProjectId::Text(value.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Number(n) => write!(f, "{}", n),
            ProjectId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 项目记录 - 对应存储中的单个元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub link: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub tech: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: bool,

    /// 未识别的字段原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// 首次运行时的示例项目
    pub fn sample(id: ProjectId, year: i32) -> Self {
        Self {
            id,
            title: "Sample Project".to_string(),
            description: "A starter project".to_string(),
            link: String::new(),
            tech: "React".to_string(),
            year: year.to_string(),
            featured: true,
            extra: Map::new(),
        }
    }

    /// 转回表单，用于编辑
    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            tech: self.tech.clone(),
            year: self.year.clone(),
            featured: self.featured,
        }
    }
}

/// 项目表单（提交前的草稿）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub link: String,
    pub tech: String,
    pub year: String,
    pub featured: bool,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// 提交校验：标题去除空白后不能为空
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PortfolioError::EmptyTitle);
        }
        Ok(())
    }

    /// 校验并生成记录，`extra` 用于编辑时保留原有的附加字段
    pub fn into_project(self, id: ProjectId, extra: Map<String, Value>) -> Result<Project> {
        self.validate()?;
        Ok(Project {
            id,
            title: self.title,
            description: self.description,
            link: self.link,
            tech: self.tech,
            year: self.year,
            featured: self.featured,
            extra,
        })
    }
}

/// 学生信息（单例，不写入存储）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub course: String,
}

impl Default for Student {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            course: "MCA".to_string(),
        }
    }
}

/// 宽松的字符串字段：null 视为空串，数字/布尔转为文本
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

/// 宽松的布尔字段，按 JS 真值规则：null / 0 / NaN / 空串为 false
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_id_accepts_numbers_and_strings() {
        let int: ProjectId = serde_json::from_value(json!(1700000000000_i64)).unwrap();
        let float: ProjectId = serde_json::from_value(json!(1700000000000.25)).unwrap();
        let text: ProjectId = serde_json::from_value(json!("abc")).unwrap();

        assert_eq!(int, ProjectId::from(1700000000000));
        assert_eq!(int.to_string(), "1700000000000");
        assert!(matches!(float, ProjectId::Number(_)));
        assert_ne!(float, int);
        assert_eq!(text, ProjectId::from("abc"));
    }

    #[test]
    fn test_integral_float_id_equals_integer_id() {
        let float: ProjectId = serde_json::from_value(json!(5.0)).unwrap();
        assert_eq!(float, ProjectId::from(5));
        assert_eq!(float.to_string(), "5");

        let fraction: ProjectId = serde_json::from_value(json!(5.5)).unwrap();
        assert_ne!(fraction, ProjectId::from(5));
        assert_eq!(fraction.to_string(), "5.5");
    }

    #[test]
    fn test_featured_follows_truthiness() {
        let featured = |raw: Value| -> bool {
            serde_json::from_value::<Project>(json!({"id": 1, "featured": raw}))
                .unwrap()
                .featured
        };

        assert!(!featured(json!(null)));
        assert!(!featured(json!(0)));
        assert!(featured(json!(1)));
        assert!(!featured(json!("")));
        assert!(featured(json!("yes")));
        assert!(featured(json!(true)));
    }

    #[test]
    fn test_project_missing_fields_default_to_empty() {
        let project: Project = serde_json::from_value(json!({"id": 7, "title": "Only title"})).unwrap();

        assert_eq!(project.title, "Only title");
        assert_eq!(project.description, "");
        assert_eq!(project.tech, "");
        assert!(!project.featured);
        assert!(project.extra.is_empty());
    }

    #[test]
    fn test_project_lenient_fields() {
        let project: Project = serde_json::from_value(json!({
            "id": 1,
            "title": "T",
            "description": null,
            "year": 2024
        }))
        .unwrap();

        assert_eq!(project.description, "");
        assert_eq!(project.year, "2024");

        let bad = serde_json::from_value::<Project>(json!({"id": 1, "title": ["x"]}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_project_preserves_unknown_fields() {
        let raw = json!({"id": 3, "title": "Keep", "stars": 5});
        let project: Project = serde_json::from_value(raw).unwrap();
        assert_eq!(project.extra.get("stars"), Some(&json!(5)));

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["stars"], json!(5));
        assert_eq!(back["id"], json!(3));
        assert_eq!(back["featured"], json!(false));
    }

    #[test]
    fn test_draft_rejects_blank_title() {
        let draft = ProjectDraft::new("   ");
        let err = draft.into_project(ProjectId::from(1), Map::new()).unwrap_err();
        assert!(matches!(err, PortfolioError::EmptyTitle));
    }

    #[test]
    fn test_draft_round_trip() {
        let mut draft = ProjectDraft::new("Parser");
        draft.tech = "Rust".to_string();
        draft.featured = true;

        let project = draft.clone().into_project(ProjectId::from(9), Map::new()).unwrap();
        assert_eq!(project.to_draft(), draft);
    }
}
