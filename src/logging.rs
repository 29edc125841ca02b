//! 日志初始化
//!
//! 过滤规则优先级：`PORTFOLIO_LOG` 环境变量 > `-v` 参数 > 配置文件 `log.level`

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "PORTFOLIO_LOG";

/// 根据 `-v` 次数选择过滤级别，0 表示使用配置值
pub fn filter_directive(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// 安装全局 subscriber，输出到 stderr；重复调用时忽略
pub fn init(verbosity: u8, configured: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(filter_directive(verbosity, configured)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
