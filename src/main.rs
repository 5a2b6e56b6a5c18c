//! # modutils 命令行入口
//!
//! ## 子命令
//! - `hash`  - 计算或提取 SHA-256 摘要
//! - `fetch` - 批量并发 HTTP 请求
//! - `pkg`   - pip 包管理
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/  (批量执行器)
//!   │     ├── http/   (HTTP 会话)
//!   │     └── hash/   (摘要扫描)
//!   └── utils/      (工具函数)
//! ```

use anyhow::anyhow;
use clap::Parser;
use modutils::cli::Cli;
use modutils::commands;
use modutils::utils::output;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose)?;
    commands::run(cli)?;
    Ok(())
}

/// `RUST_LOG` 优先，否则按 `--verbose` 选择级别
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose {
        "modutils=debug"
    } else {
        "modutils=info"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}
