//! # pkg 子命令 CLI 定义
//!
//! pip 包的安装、升级、列出与查询
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pkg.rs`

use clap::{Args, Subcommand};

/// pkg 子命令参数
#[derive(Args, Debug)]
pub struct PkgArgs {
    /// pip executable to invoke
    #[arg(long, default_value = "pip3", env = "MODUTILS_PIP")]
    pub pip: String,

    #[command(subcommand)]
    pub action: PkgAction,
}

/// pkg 动作
#[derive(Subcommand, Debug)]
pub enum PkgAction {
    /// Install a package
    Install {
        name: String,

        /// Upgrade to the newest release
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Extra package index URL
        #[arg(long)]
        extra_index: Option<String>,

        /// Host to trust for the extra index
        #[arg(long)]
        trusted_host: Option<String>,
    },

    /// Upgrade a package to the newest release
    Update {
        name: String,

        #[arg(long)]
        extra_index: Option<String>,

        #[arg(long)]
        trusted_host: Option<String>,
    },

    /// List installed packages
    List {
        /// Only show packages containing this text
        filter: Option<String>,
    },

    /// Check whether a package is installed
    Has {
        name: String,

        /// Require an exact version
        #[arg(value_name = "VERSION")]
        pkg_version: Option<String>,
    },
}
