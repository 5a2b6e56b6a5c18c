//! # pip 包管理封装
//!
//! 通过子进程调用 `pip3` 安装、更新、列出和查询 Python 包。
//!
//! ## 功能
//! - `install_package`: `pip3 install NAME [--extra-index-url URL] [--trusted-host HOST] [--upgrade]`
//! - `update_package`: 等价于强制升级安装
//! - `list_packages`: `pip3 freeze` 的非空行
//! - `has_package`: 按名称或 `name==version` 子串匹配
//!
//! ## 依赖关系
//! - 被 `commands/pkg.rs` 使用

use crate::error::{Error, Result};

use std::io;
use std::process::Command;
use tracing::debug;

/// pip 配置
#[derive(Debug, Clone)]
pub struct PipConfig {
    /// 可执行程序名
    pub program: String,
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            program: "pip3".to_string(),
        }
    }
}

/// 安装选项
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// 升级到最新版本
    pub force: bool,
    pub extra_index: Option<String>,
    pub trusted_host: Option<String>,
}

/// 子进程输出
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// 构造 install 参数列表
pub fn install_args(name: &str, options: &InstallOptions) -> Vec<String> {
    let mut args = vec!["install".to_string(), name.to_string()];
    if let Some(index) = &options.extra_index {
        args.push("--extra-index-url".to_string());
        args.push(index.clone());
    }
    if let Some(host) = &options.trusted_host {
        args.push("--trusted-host".to_string());
        args.push(host.clone());
    }
    if options.force {
        args.push("--upgrade".to_string());
    }
    args
}

/// 解析 `pip freeze` 输出
pub fn parse_freeze(stdout: &str) -> Vec<String> {
    stdout
        .replace('\r', "")
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 包列表中是否有匹配项
pub fn contains_package(packages: &[String], name: &str, version: Option<&str>) -> bool {
    let needle = match version {
        Some(version) => format!("{}=={}", name, version),
        None => name.to_string(),
    };
    packages.iter().any(|pkg| pkg.contains(&needle))
}

/// pip 调用器
#[derive(Debug, Clone, Default)]
pub struct Pip {
    config: PipConfig,
}

impl Pip {
    pub fn new(config: PipConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    /// 安装包
    pub fn install_package(&self, name: &str, options: &InstallOptions) -> Result<CommandOutput> {
        self.run(&install_args(name, options))
    }

    /// 升级包
    pub fn update_package(
        &self,
        name: &str,
        extra_index: Option<&str>,
        trusted_host: Option<&str>,
    ) -> Result<CommandOutput> {
        let options = InstallOptions {
            force: true,
            extra_index: extra_index.map(str::to_string),
            trusted_host: trusted_host.map(str::to_string),
        };
        self.install_package(name, &options)
    }

    /// 当前环境中的包（`name==version` 形式）
    pub fn list_packages(&self) -> Result<Vec<String>> {
        let out = self.run(&["freeze".to_string()])?;
        Ok(parse_freeze(&out.stdout))
    }

    pub fn has_package(&self, name: &str, version: Option<&str>) -> Result<bool> {
        Ok(contains_package(&self.list_packages()?, name, version))
    }

    fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!("{} {}", self.config.program, args.join(" "));

        let out = Command::new(&self.config.program)
            .args(args)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::CommandNotFound {
                    command: self.config.program.clone(),
                },
                _ => Error::CommandFailed {
                    command: self.config.program.clone(),
                    stderr: e.to_string(),
                },
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            success: out.status.success(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_args_order() {
        let options = InstallOptions {
            force: true,
            extra_index: Some("https://pypi.internal/simple".to_string()),
            trusted_host: Some("pypi.internal".to_string()),
        };
        assert_eq!(
            install_args("requests", &options),
            vec![
                "install",
                "requests",
                "--extra-index-url",
                "https://pypi.internal/simple",
                "--trusted-host",
                "pypi.internal",
                "--upgrade",
            ]
        );
        assert_eq!(
            install_args("requests", &InstallOptions::default()),
            vec!["install", "requests"]
        );
    }

    #[test]
    fn test_parse_freeze_and_contains() {
        let packages = parse_freeze("requests==2.31.0\r\nurllib3==2.0.7\r\n\r\n");
        assert_eq!(packages, vec!["requests==2.31.0", "urllib3==2.0.7"]);

        assert!(contains_package(&packages, "requests", None));
        assert!(contains_package(&packages, "requests", Some("2.31.0")));
        assert!(!contains_package(&packages, "requests", Some("2.0.0")));
        assert!(!contains_package(&packages, "numpy", None));
    }

    #[test]
    fn test_missing_program() {
        let pip = Pip::new(PipConfig {
            program: "modutils-no-such-pip".to_string(),
        });
        assert!(matches!(
            pip.list_packages(),
            Err(Error::CommandNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_configured_program() {
        let pip = Pip::new(PipConfig {
            program: "echo".to_string(),
        });
        let out = pip.update_package("requests", None, Some("pypi.internal")).unwrap();
        assert!(out.success);
        assert_eq!(
            out.stdout.trim(),
            "install requests --trusted-host pypi.internal --upgrade"
        );
        assert_eq!(pip.list_packages().unwrap(), vec!["freeze"]);
    }
}
