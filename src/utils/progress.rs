//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式。
//!
//! 批量执行器的进度条写到标准输出，显示已用时间、剩余时间和速率，
//! 仅供人阅读，不保证可被机器解析。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 模块使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use tracing::warn;

fn default_template(color: &str) -> String {
    format!(
        "{{msg}}{{percent:>3}}%|{{bar:40.{}}}| {{pos}}/{{len}} [{{elapsed_precise}}<{{eta_precise}}, {{per_sec}}]",
        color
    )
}

/// 构建批量执行进度条样式
///
/// `format` 为自定义模板；为空或无法解析时使用带颜色的默认模板。
/// 样式只影响显示，不会让批量调用失败。
pub fn batch_style(color: &str, format: Option<&str>) -> ProgressStyle {
    let custom = format.and_then(|template| match ProgressStyle::with_template(template) {
        Ok(style) => Some(style),
        Err(e) => {
            warn!("invalid progress template {:?}, using default: {}", template, e);
            None
        }
    });

    custom
        .or_else(|| ProgressStyle::with_template(&default_template(color)).ok())
        .unwrap_or_else(ProgressStyle::default_bar)
        .progress_chars("█▉▊▋▌▍▎▏ ")
}

/// 创建批量执行进度条（写到 stdout）
pub fn create_batch_bar(len: u64, visible: bool, color: &str, format: Option<&str>) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stdout());
    pb.set_style(batch_style(color, format));
    pb
}

/// 创建 spinner（用于不确定进度的任务）
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {elapsed_precise} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
