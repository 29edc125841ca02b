use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use student_portfolio::{
    cli::{self, ProjectChanges, Session},
    logging, ImportMode, PortfolioConfig, ProjectDraft,
};

/// Student Portfolio CLI
///
/// 本地保存项目记录，支持 JSON 导入导出
#[derive(Parser)]
#[command(name = "portfolio")]
#[command(author, version = env!("APP_VERSION"), about)]
#[command(
    long_about = "Maintain a list of student projects in local storage.\n\
                  Every change is written back immediately; export/import use portable JSON files."
)]
struct Cli {
    /// 数据目录（覆盖配置 storage.dir）
    #[arg(long, global = true, env = "PORTFOLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// 日志详细程度（-v info, -vv debug, -vvv trace）
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出项目
    List {
        /// 搜索标题、技术栈或描述
        #[arg(short, long)]
        query: Option<String>,

        /// 只显示标星项目
        #[arg(long)]
        featured: bool,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 显示单个项目
    Show {
        id: String,
    },

    /// 新增项目
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "")]
        link: String,

        #[arg(long, default_value = "")]
        tech: String,

        #[arg(short, long, default_value = "")]
        year: String,

        #[arg(short, long)]
        featured: bool,
    },

    /// 编辑项目（只修改给出的字段）
    Update {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        link: Option<String>,

        #[arg(long)]
        tech: Option<String>,

        #[arg(short, long)]
        year: Option<String>,

        /// true / false
        #[arg(short, long)]
        featured: Option<bool>,
    },

    /// 删除项目
    Delete {
        id: String,

        /// 跳过确认
        #[arg(short, long)]
        yes: bool,
    },

    /// 切换标星
    Feature {
        id: String,
    },

    /// 导出为 JSON
    Export {
        /// 输出文件（默认：<export.dir>/student_portfolio_<时间>.json）
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// 打印到标准输出
        #[arg(long)]
        stdout: bool,

        /// 本次导出使用的学生姓名
        #[arg(long)]
        student_name: Option<String>,
    },

    /// 从 JSON 导入（默认合并）
    Import {
        file: PathBuf,

        /// 替换现有项目而不是合并
        #[arg(long)]
        replace: bool,
    },

    /// 清空已保存的项目
    Clear,

    /// 显示学生信息
    Student,

    /// 显示生效的配置
    Config,
}

// ═══════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PortfolioConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.storage.dir = Some(dir);
    }
    logging::init(cli.verbose, &config.log.level);

    if let Commands::Config = cli.command {
        return cli::show_config(&config);
    }

    let mut session = Session::open(config)?;

    match cli.command {
        Commands::List {
            query,
            featured,
            json,
        } => cli::list_projects(&session, query.as_deref(), featured, json),
        Commands::Show { id } => cli::show_project(&session, &id),
        Commands::Add {
            title,
            description,
            link,
            tech,
            year,
            featured,
        } => {
            let draft = ProjectDraft {
                title,
                description,
                link,
                tech,
                year,
                featured,
            };
            cli::add_project(&mut session, draft)
        }
        Commands::Update {
            id,
            title,
            description,
            link,
            tech,
            year,
            featured,
        } => {
            let changes = ProjectChanges {
                title,
                description,
                link,
                tech,
                year,
                featured,
            };
            cli::update_project(&mut session, &id, changes)
        }
        Commands::Delete { id, yes } => cli::delete_project(&mut session, &id, yes),
        Commands::Feature { id } => cli::toggle_feature(&mut session, &id),
        Commands::Export {
            output,
            stdout,
            student_name,
        } => cli::export_portfolio(
            &mut session,
            output.as_deref(),
            stdout,
            student_name.as_deref(),
        ),
        Commands::Import { file, replace } => {
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Merge
            };
            cli::import_portfolio(&mut session, &file, mode)
        }
        Commands::Clear => cli::clear_storage(&mut session),
        Commands::Student => cli::show_student(&session),
        Commands::Config => unreachable!("config is handled before the store is opened"),
    }
}
