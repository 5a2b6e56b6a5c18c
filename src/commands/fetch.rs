//! # fetch 命令实现
//!
//! 把 URL 列表交给 HTTP 会话的批量接口，输出状态报告。
//!
//! ## 功能
//! - 读取 URL 文件（忽略空行与 `#` 注释）
//! - 解析 `Name: value` 形式的请求头
//! - 通过批量执行器并发请求（带重试）
//! - 终端表格 + 可选 CSV 报告
//! - 可选从 JSON 正文中按键路径取字段
//!
//! ## 依赖关系
//! - 使用 `cli/fetch.rs` 定义的参数
//! - 使用 `http/`, `batch/`
//! - 使用 `utils/echo.rs`, `utils/nget.rs`, `utils/output.rs`

use crate::batch::BatchOptions;
use crate::cli::fetch::{FetchArgs, FetchMethod};
use crate::error::{Error, Result};
use crate::http::{BulkRequest, HttpResponse, HttpSession, RequestOptions, SessionConfig};
use crate::utils::echo::{self, EchoOptions, Render};
use crate::utils::{nget, output};

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tabled::{Table, Tabled};

/// 报告行
#[derive(Debug, Clone, Serialize, Tabled)]
struct FetchRow {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: u16,
    #[tabled(rename = "Bytes")]
    content_size: usize,
    #[tabled(rename = "Field")]
    field: String,
}

/// 执行 fetch 命令
pub fn execute(args: FetchArgs, verbose: bool) -> Result<()> {
    output::print_header("Bulk HTTP Requests");

    let urls = read_urls(&args.urls_file)?;
    if urls.is_empty() {
        output::print_warning(&format!("No URLs in '{}'", args.urls_file.display()));
        return Ok(());
    }

    let request_options = parse_headers(&args.headers)?;
    let mut echo_options = EchoOptions::default();
    if let Some(name) = &args.color {
        echo_options = echo_options.with_color(output::parse_color(name)?);
    }
    let requests: Vec<BulkRequest> = urls
        .into_iter()
        .map(|url| BulkRequest::new(url, request_options.clone()))
        .collect();

    let mut config = SessionConfig::bulk()
        .with_max_retries(args.retries)
        .with_verbose(verbose);
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let session = HttpSession::new(config)?;

    let options = BatchOptions::default()
        .with_max_concurrency(args.concurrency)
        .with_max_chunk_size(args.chunk_size)
        .with_progress(!args.no_progress);

    output::print_info(&format!(
        "Sending {} {} request(s), {} at a time",
        requests.len(),
        args.method,
        args.concurrency
    ));

    let responses = match args.method {
        FetchMethod::Get => session.get_bulk(requests, &options)?,
        FetchMethod::Head => session.head_bulk(requests, &options)?,
        FetchMethod::Delete => session.delete_bulk(requests, &options)?,
    };

    let keys = field_keys(args.field.as_deref());
    let rows: Vec<FetchRow> = responses.iter().map(|r| report_row(r, &keys)).collect();

    if args.show_body {
        for response in &responses {
            output::print_separator();
            println!("{} {}", output::status_label(response.status()), response.url());
            echo::echo(response, &echo_options);
        }
        output::print_separator();
    }

    println!("{}", Table::new(&rows));

    if let Some(path) = &args.output {
        write_report(&rows, path)?;
        output::print_success(&format!("Report saved to '{}'", path.display()));
    }

    let ok = responses.iter().filter(|r| r.is_success()).count();
    output::print_done(&format!(
        "{} response(s): {} success, {} other",
        responses.len(),
        ok,
        responses.len() - ok
    ));

    Ok(())
}

/// 读取 URL 列表
fn read_urls(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// 解析 `Name: value` 请求头
fn parse_headers(headers: &[String]) -> Result<RequestOptions> {
    headers.iter().try_fold(RequestOptions::new(), |options, raw| {
        let (name, value) = raw.split_once(':').ok_or_else(|| {
            Error::InvalidArgument(format!("Header '{}' is not in 'Name: value' form", raw))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument(format!("Header '{}' has no name", raw)));
        }
        Ok(options.header(name, value.trim()))
    })
}

fn field_keys(field: Option<&str>) -> Vec<String> {
    field
        .map(|f| f.split('.').filter(|k| !k.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

fn report_row(response: &HttpResponse, keys: &[String]) -> FetchRow {
    FetchRow {
        method: response.method().to_string(),
        url: response.url().to_string(),
        status: response.status(),
        content_size: response.content_size(),
        field: extract_field(response, keys),
    }
}

/// 从 JSON 正文中取字段，取不到时为 "-"
fn extract_field(response: &HttpResponse, keys: &[String]) -> String {
    if keys.is_empty() {
        return "-".to_string();
    }
    let Ok(body) = response.json::<Value>() else {
        return "-".to_string();
    };

    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    let missing = Value::String("-".to_string());
    nget::nget_or(&body, &keys, &missing).render(&EchoOptions::default().with_delimiter(","))
}

fn write_report(rows: &[FetchRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| Error::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
