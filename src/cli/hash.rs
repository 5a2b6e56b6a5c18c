//! # hash 子命令 CLI 定义
//!
//! 计算文件内容的 SHA-256，或提取文本中已有的摘要
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/hash.rs`

use clap::Args;
use std::path::PathBuf;

/// hash 子命令参数
#[derive(Args, Debug)]
pub struct HashArgs {
    /// File or directory to scan
    pub path: PathBuf,

    /// Extract sha256 digests found in file contents instead of hashing them
    #[arg(short, long, default_value_t = false)]
    pub extract: bool,

    /// Show results as a file -> digest table
    #[arg(short, long, default_value_t = false)]
    pub map: bool,

    /// Fail when the path does not exist
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Glob pattern(s) for files in a directory, comma separated
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel workers (0 = all CPU cores)
    #[arg(short, long, default_value_t = 0, env = "MODUTILS_JOBS")]
    pub jobs: usize,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
