//! # echo 打印工具
//!
//! 自动把常见对象整理成可打印文本。
//!
//! ## 功能
//! - 列表按分隔符拼接
//! - JSON 对象按缩进美化
//! - HTTP 响应按状态码解释（`response_to_str`）
//! - 可选颜色、覆盖当前行（flush）
//! - `scroll`：在同一行上逐条滚动显示
//!
//! ## 依赖关系
//! - 使用 `http/response.rs`, `utils/output.rs`
//! - 被 `commands/fetch.rs` 使用

use super::output;
use crate::http::HttpResponse;

use colored::Color;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fmt::Display;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// echo 选项
#[derive(Debug, Clone)]
pub struct EchoOptions {
    /// 列表分隔符
    pub list_delimiter: String,
    /// JSON 缩进空格数
    pub indent: usize,
    pub color: Option<Color>,
    /// 以 `\r` 结尾并立即刷新，下一次输出覆盖当前行
    pub flush: bool,
}

impl Default for EchoOptions {
    fn default() -> Self {
        EchoOptions {
            list_delimiter: "\n".to_string(),
            indent: 4,
            color: None,
            flush: false,
        }
    }
}

impl EchoOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.list_delimiter = delimiter.into();
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_flush(mut self, flush: bool) -> Self {
        self.flush = flush;
        self
    }
}

/// 可被 echo 的内容
pub trait Render {
    fn render(&self, options: &EchoOptions) -> String;
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self, options: &EchoOptions) -> String {
        (**self).render(options)
    }
}

impl Render for str {
    fn render(&self, _: &EchoOptions) -> String {
        self.to_string()
    }
}

impl Render for String {
    fn render(&self, _: &EchoOptions) -> String {
        self.clone()
    }
}

impl<T: Display> Render for [T] {
    fn render(&self, options: &EchoOptions) -> String {
        self.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&options.list_delimiter)
    }
}

impl<T: Display> Render for Vec<T> {
    fn render(&self, options: &EchoOptions) -> String {
        self.as_slice().render(options)
    }
}

impl Render for Value {
    fn render(&self, options: &EchoOptions) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(&options.list_delimiter),
            Value::Object(_) => to_pretty_json(self, options.indent),
            other => other.to_string(),
        }
    }
}

impl Render for HttpResponse {
    fn render(&self, _: &EchoOptions) -> String {
        response_to_str(self)
    }
}

macro_rules! render_display {
    ($($ty:ty),*) => {
        $(
            impl Render for $ty {
                fn render(&self, _: &EchoOptions) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

render_display!(bool, char, i32, i64, u32, u64, usize, f32, f64);

/// 以指定缩进美化 JSON
pub fn to_pretty_json(value: &Value, indent: usize) -> String {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

/// 把 HTTP 响应转换为文本并解释状态码
pub fn response_to_str(response: &HttpResponse) -> String {
    let status = response.status();
    let url = response.url();

    match status {
        200..=208 | 226 => match response.json::<Value>() {
            Ok(value) => to_pretty_json(&value, 4),
            Err(_) => response.text(),
        },
        401 | 403 => format!("({}) Invalid permissions for requests: {}", status, url),
        404 => format!("({}) Unable to find requested resource for: {}", status, url),
        400 => format!("({}) Bad request to: {}", status, url),
        s if s >= 500 => format!(
            "({}) Server error - {} - {} - {}",
            status,
            url,
            status,
            response.text()
        ),
        _ => format!("({}) {}", status, response.text()),
    }
}

/// 生成 echo 将要打印的文本（含颜色）
pub fn format_echo<C: Render + ?Sized>(content: &C, options: &EchoOptions) -> String {
    output::paint(&content.render(options), options.color)
}

/// 打印任意可渲染内容
pub fn echo<C: Render + ?Sized>(content: &C, options: &EchoOptions) {
    let text = format_echo(content, options);
    if options.flush {
        print!("{}\r", text);
        // 刷新失败只影响显示
        let _ = io::stdout().flush();
    } else {
        println!("{}", text);
    }
}

/// 在同一行上逐条显示，每条之间暂停 `delay`
pub fn scroll<I>(items: I, delay: Duration, options: &EchoOptions)
where
    I: IntoIterator,
    I::Item: Render,
{
    let options = options.clone().with_flush(true);
    for item in items {
        echo(&item, &options);
        thread::sleep(delay);
    }
}
