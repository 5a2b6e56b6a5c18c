//! # fetch 子命令 CLI 定义
//!
//! 从文件读取 URL 列表，批量发送请求并输出报告
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/fetch.rs`

use crate::batch::options::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_CONCURRENCY};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 请求方法
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    Head,
    Delete,
}

impl std::fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMethod::Get => write!(f, "GET"),
            FetchMethod::Head => write!(f, "HEAD"),
            FetchMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// fetch 子命令参数
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// File with one URL per line ('#' starts a comment)
    pub urls_file: PathBuf,

    /// HTTP method
    #[arg(long, value_enum, default_value = "get")]
    pub method: FetchMethod,

    /// Maximum number of requests in flight
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY, env = "MODUTILS_CONCURRENCY")]
    pub concurrency: usize,

    /// Maximum number of requests per chunk
    #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_SIZE, env = "MODUTILS_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Retries for unresolved responses
    #[arg(long, default_value_t = 3, env = "MODUTILS_RETRIES")]
    pub retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "MODUTILS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Extra request header, e.g. 'Accept: application/json' (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Dotted key path to pull from JSON bodies into the report, e.g. 'data.id'
    #[arg(long)]
    pub field: Option<String>,

    /// Write the report to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print each response body
    #[arg(long, default_value_t = false)]
    pub show_body: bool,

    /// Colour for printed bodies, e.g. 'cyan' or 'bright blue'
    #[arg(long)]
    pub color: Option<String>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
