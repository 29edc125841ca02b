//! 列表渲染

use colored::Colorize;

use crate::portfolio::{Project, Student};

/// 项目列表渲染器
pub struct ProjectRenderer;

impl ProjectRenderer {
    /// 单个项目卡片
    pub fn render_project(project: &Project) -> String {
        let mut output = String::new();

        let star = if project.featured { "★".yellow().to_string() } else { " ".to_string() };
        let year = if project.year.is_empty() {
            String::new()
        } else {
            format!(" ({})", project.year)
        };
        output.push_str(&format!(
            "{} {}{}  {}\n",
            star,
            project.title.bold(),
            year,
            format!("#{}", project.id).dimmed()
        ));

        if !project.description.is_empty() {
            output.push_str(&format!("    {}\n", project.description));
        }
        if !project.tech.is_empty() {
            output.push_str(&format!("    Tech: {}\n", project.tech.cyan()));
        }
        if !project.link.is_empty() {
            output.push_str(&format!("    Link: {}\n", project.link.underline()));
        }

        output
    }

    /// 项目列表；`total` 为过滤前的总数
    pub fn render_list(projects: &[&Project], total: usize, query: Option<&str>) -> String {
        let mut output = String::new();

        if projects.is_empty() {
            match query {
                Some(q) if !q.trim().is_empty() => {
                    output.push_str(&format!("No projects match \"{}\".\n", q.trim()))
                }
                _ => output.push_str("No projects yet.\n"),
            }
            return output;
        }

        for project in projects {
            output.push_str(&Self::render_project(project));
        }

        if projects.len() == total {
            output.push_str(&format!("\nTotal: {}\n", total));
        } else {
            output.push_str(&format!("\nShowing {} of {}\n", projects.len(), total));
        }

        output
    }

    pub fn render_student(student: &Student) -> String {
        format!("👤 {} · {}\n", student.name.bold(), student.course)
    }
}
