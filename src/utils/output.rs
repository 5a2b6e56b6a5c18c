//! # 美化输出工具
//!
//! 提供统一的终端输出样式与颜色解析。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `utils/echo.rs` 使用
//! - 使用 `colored` crate

use crate::error::{Error, Result};

use colored::{Color, Colorize};

/// 解析颜色名（如 `green`, `bright blue`）
pub fn parse_color(name: &str) -> Result<Color> {
    name.parse::<Color>()
        .map_err(|_| Error::InvalidArgument(format!("Unknown color '{}'", name)))
}

/// 按需着色
pub fn paint(text: &str, color: Option<Color>) -> String {
    match color {
        Some(color) => text.color(color).to_string(),
        None => text.to_string(),
    }
}

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 按 HTTP 状态码分类着色
pub fn status_label(status: u16) -> String {
    let label = status.to_string();
    match status {
        200..=299 => label.green().to_string(),
        300..=399 => label.cyan().to_string(),
        400..=499 => label.yellow().to_string(),
        _ => label.red().bold().to_string(),
    }
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("green").unwrap(), Color::Green);
        assert_eq!(parse_color("bright blue").unwrap(), Color::BrightBlue);
        assert!(matches!(
            parse_color("green_3a"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_paint_without_color_is_plain() {
        assert_eq!(paint("plain", None), "plain");
    }
}
