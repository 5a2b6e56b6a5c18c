//! # pkg 命令实现
//!
//! 调用 pip 安装/升级/列出/查询包。
//!
//! ## 依赖关系
//! - 使用 `cli/pkg.rs` 定义的参数
//! - 使用 `utils/pip.rs`, `utils/output.rs`, `utils/progress.rs`

use crate::cli::pkg::{PkgAction, PkgArgs};
use crate::error::{Error, Result};
use crate::utils::pip::{CommandOutput, InstallOptions, Pip, PipConfig};
use crate::utils::{output, progress};

/// 执行 pkg 命令
pub fn execute(args: PkgArgs) -> Result<()> {
    let pip = Pip::new(PipConfig { program: args.pip });

    match args.action {
        PkgAction::Install {
            name,
            force,
            extra_index,
            trusted_host,
        } => {
            let options = InstallOptions {
                force,
                extra_index,
                trusted_host,
            };
            let spinner = progress::create_spinner(&format!("Installing {}", name));
            let out = pip.install_package(&name, &options);
            spinner.finish_and_clear();
            check(&pip, "install", out?)?;
            output::print_success(&format!("Installed '{}'", name));
        }
        PkgAction::Update {
            name,
            extra_index,
            trusted_host,
        } => {
            let spinner = progress::create_spinner(&format!("Updating {}", name));
            let out = pip.update_package(&name, extra_index.as_deref(), trusted_host.as_deref());
            spinner.finish_and_clear();
            check(&pip, "update", out?)?;
            output::print_success(&format!("Updated '{}'", name));
        }
        PkgAction::List { filter } => {
            let packages = pip.list_packages()?;
            let shown: Vec<&String> = packages
                .iter()
                .filter(|pkg| filter.as_deref().map_or(true, |f| pkg.contains(f)))
                .collect();
            for pkg in &shown {
                println!("{}", pkg);
            }
            output::print_done(&format!("{} package(s)", shown.len()));
        }
        PkgAction::Has { name, pkg_version } => {
            let label = match &pkg_version {
                Some(v) => format!("{}=={}", name, v),
                None => name.clone(),
            };
            if pip.has_package(&name, pkg_version.as_deref())? {
                output::print_success(&format!("'{}' is installed", label));
            } else {
                output::print_warning(&format!("'{}' is not installed", label));
            }
        }
    }

    Ok(())
}

/// pip 非零退出时转换为错误
fn check(pip: &Pip, action: &str, out: CommandOutput) -> Result<CommandOutput> {
    if out.success {
        Ok(out)
    } else {
        Err(Error::CommandFailed {
            command: format!("{} {}", pip.program(), action),
            stderr: out.stderr.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failed_command() {
        let pip = Pip::default();
        let failed = CommandOutput {
            stdout: String::new(),
            stderr: "ERROR: No matching distribution\n".to_string(),
            success: false,
        };

        match check(&pip, "install", failed) {
            Err(Error::CommandFailed { command, stderr }) => {
                assert_eq!(command, "pip3 install");
                assert_eq!(stderr, "ERROR: No matching distribution");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_pip_reports_not_found() {
        let args = PkgArgs {
            pip: "modutils-no-such-pip".to_string(),
            action: PkgAction::List { filter: None },
        };
        assert!(matches!(execute(args), Err(Error::CommandNotFound { .. })));
    }
}
