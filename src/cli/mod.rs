//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `hash`: 计算或提取 SHA-256 摘要
//! - `fetch`: 通过批量执行器并发发送 HTTP 请求
//! - `pkg`: pip 包管理（嵌套子命令）
//!   - `install` / `update` / `list` / `has`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: hash, fetch, pkg

pub mod fetch;
pub mod hash;
pub mod pkg;

use clap::{Parser, Subcommand};

/// modutils - 批量并发执行与常用工具集
#[derive(Parser)]
#[command(name = "modutils")]
#[command(author = "Tanner Burns")]
#[command(version)]
#[command(about = "Bounded-concurrency batch execution, retrying HTTP and digest utilities", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Calculate or extract sha256 digests for a file or directory
    Hash(hash::HashArgs),

    /// Run many HTTP requests through the bulk executor
    Fetch(fetch::FetchArgs),

    /// Manage pip packages in the current environment
    Pkg(pkg::PkgArgs),
}
