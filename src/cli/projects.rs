//! 项目命令实现

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::render::ProjectRenderer;
use crate::config::PortfolioConfig;
use crate::error::PortfolioError;
use crate::portfolio::{
    filter_projects, LoadOutcome, PortfolioStore, ProjectDraft, ProjectId,
};
use crate::storage::FileStore;
use crate::transfer::{export_filename, ImportMode};
use crate::utils::{read_file, write_json};

/// 一次命令执行的上下文：配置 + 已加载的存储
pub struct Session {
    pub config: PortfolioConfig,
    pub store: PortfolioStore<FileStore>,
}

impl Session {
    pub fn open(config: PortfolioConfig) -> Result<Self> {
        let dir = config.storage.resolve_dir()?;
        let backend = FileStore::new(dir);
        let mut store = PortfolioStore::new(backend, config.storage.key.clone())
            .with_student(config.student.clone());

        match store.load().context("Failed to load saved projects")? {
            LoadOutcome::Corrupt(err) => {
                eprintln!("{}", format!("⚠️  {}", err).yellow());
                eprintln!("   Starting with an empty list; the next change will overwrite it.");
            }
            LoadOutcome::Seeded => {
                eprintln!("ℹ️  No saved projects found, added a sample project.");
            }
            LoadOutcome::Restored { .. } => {}
        }

        Ok(Self { config, store })
    }

    /// 把命令行参数解析为已存在的项目 ID
    fn resolve_id(&self, text: &str) -> Result<ProjectId> {
        self.store
            .find_id(text.trim())
            .ok_or_else(|| PortfolioError::ProjectNotFound(ProjectId::from(text.trim())).into())
    }
}

/// 编辑时的可选字段
#[derive(Debug, Default, Clone)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tech: Option<String>,
    pub year: Option<String>,
    pub featured: Option<bool>,
}

impl ProjectChanges {
    fn apply(self, mut draft: ProjectDraft) -> ProjectDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(link) = self.link {
            draft.link = link;
        }
        if let Some(tech) = self.tech {
            draft.tech = tech;
        }
        if let Some(year) = self.year {
            draft.year = year;
        }
        if let Some(featured) = self.featured {
            draft.featured = featured;
        }
        draft
    }
}

// ═══════════════════════════════════════════════════════════════════
// 查询
// ═══════════════════════════════════════════════════════════════════

/// 列出项目（可搜索）
pub fn list_projects(
    session: &Session,
    query: Option<&str>,
    featured_only: bool,
    as_json: bool,
) -> Result<()> {
    let projects = session.store.projects();
    let mut hits = filter_projects(projects, query.unwrap_or(""));
    if featured_only {
        hits.retain(|p| p.featured);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    print!("{}", ProjectRenderer::render_student(session.store.student()));
    println!();
    print!("{}", ProjectRenderer::render_list(&hits, projects.len(), query));

    Ok(())
}

pub fn show_project(session: &Session, id: &str) -> Result<()> {
    let id = session.resolve_id(id)?;
    if let Some(project) = session.store.get(&id) {
        print!("{}", ProjectRenderer::render_project(project));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 变更
// ═══════════════════════════════════════════════════════════════════

pub fn add_project(session: &mut Session, draft: ProjectDraft) -> Result<()> {
    let id = session.store.add(draft)?;
    println!("{} Added project {}", "✓".green(), id.to_string().cyan());
    Ok(())
}

pub fn update_project(session: &mut Session, id: &str, changes: ProjectChanges) -> Result<()> {
    let id = session.resolve_id(id)?;
    let current = session
        .store
        .get(&id)
        .map(|p| p.to_draft())
        .ok_or_else(|| PortfolioError::ProjectNotFound(id.clone()))?;

    if session.store.update(&id, changes.apply(current))? {
        println!("{} Updated project {}", "✓".green(), id.to_string().cyan());
    }
    Ok(())
}

/// 删除前需要确认，`--yes` 跳过
pub fn delete_project(session: &mut Session, id: &str, yes: bool) -> Result<()> {
    let id = session.resolve_id(id)?;

    if !yes && !confirm("Delete this project?")? {
        println!("Cancelled.");
        return Ok(());
    }

    if session.store.delete(&id)? {
        println!("{} Deleted project {}", "✓".green(), id.to_string().cyan());
    }
    Ok(())
}

pub fn toggle_feature(session: &mut Session, id: &str) -> Result<()> {
    let id = session.resolve_id(id)?;
    session.store.toggle_featured(&id)?;

    let featured = session.store.get(&id).map(|p| p.featured).unwrap_or(false);
    let label = if featured { "Featured" } else { "Unfeatured" };
    println!("{} {} project {}", "✓".green(), label, id.to_string().cyan());
    Ok(())
}

/// 清空已保存的项目
pub fn clear_storage(session: &mut Session) -> Result<()> {
    session.store.clear()?;
    println!("{} Local storage cleared (projects).", "✓".green());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 导入 / 导出
// ═══════════════════════════════════════════════════════════════════

/// 导出为 JSON 文件或打印到标准输出
pub fn export_portfolio(
    session: &mut Session,
    output: Option<&Path>,
    to_stdout: bool,
    student_name: Option<&str>,
) -> Result<()> {
    if let Some(name) = student_name {
        session.store.set_student_name(name);
    }

    let now = Utc::now();
    let document = session.store.export(now);

    if to_stdout {
        println!("{}", document.to_json_pretty()?);
        return Ok(());
    }

    let path: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => session.config.export.dir.join(export_filename(now)),
    };
    write_json(&path, &document)?;

    println!(
        "{} Exported {} projects to {}",
        "✓".green(),
        document.projects.len(),
        path.display().to_string().cyan()
    );
    Ok(())
}

/// 从 JSON 文件导入，默认合并
pub fn import_portfolio(session: &mut Session, file: &Path, mode: ImportMode) -> Result<()> {
    let raw = read_file(file)?;

    let summary = session
        .store
        .import_str(&raw, mode)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!("{} {}", "✓".green(), summary);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 学生信息 / 配置
// ═══════════════════════════════════════════════════════════════════

pub fn show_student(session: &Session) -> Result<()> {
    print!("{}", ProjectRenderer::render_student(session.store.student()));
    println!(
        "💡 Tip: the profile is not saved with projects; set {} / {} in config.toml",
        "student.name".cyan(),
        "student.course".cyan()
    );
    Ok(())
}

pub fn show_config(config: &PortfolioConfig) -> Result<()> {
    let dir = config.storage.resolve_dir()?;

    println!("{}", "⚙️  Effective configuration".cyan().bold());
    println!("   Data dir:    {}", dir.display().to_string().yellow());
    println!("   Storage key: {}", config.storage.key.yellow());
    println!("   Export dir:  {}", config.export.dir.display());
    println!(
        "   Student:     {} ({})",
        config.student.name, config.student.course
    );
    println!("   Log level:   {}", config.log.level);
    if let Some(global) = PortfolioConfig::global_config_path() {
        println!("   User config: {}", global.display());
    }

    Ok(())
}

/// 终端确认 (y/N)
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
