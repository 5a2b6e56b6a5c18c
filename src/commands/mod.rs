//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `http/`, `hash/`, `utils/`
//! - 子模块: hash, fetch, pkg

pub mod fetch;
pub mod hash;
pub mod pkg;

use crate::cli::{Cli, Commands};
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Hash(args) => hash::execute(args),
        Commands::Fetch(args) => fetch::execute(args, cli.verbose),
        Commands::Pkg(args) => pkg::execute(args),
    }
}
