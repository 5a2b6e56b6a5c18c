//! # HTTP 响应
//!
//! 已读取完正文的响应快照，可在线程间传递、重复读取。
//!
//! ## 依赖关系
//! - 由 `http/session.rs` 构造
//! - 被 `utils/echo.rs` 的 `response_to_str` 使用

use crate::error::Result;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

/// 已完成的 HTTP 响应
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Vec<u8>,
    user_agent: String,
}

impl HttpResponse {
    /// 手动构造响应
    pub fn new(status: u16, method: Method, url: Url, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            method,
            url,
            headers: HeaderMap::new(),
            body: body.into(),
            user_agent: "Unknown".to_string(),
        }
    }

    /// 读取 reqwest 响应的全部正文
    pub(crate) fn read(
        method: Method,
        user_agent: String,
        response: reqwest::blocking::Response,
    ) -> Result<Self> {
        let status = response.status().as_u16();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

        Ok(Self {
            status,
            method,
            url,
            headers,
            body,
            user_agent,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 正文字节数
    pub fn content_size(&self) -> usize {
        self.body.len()
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 正文文本（非 UTF-8 字节按替换字符处理）
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 将正文解析为 JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// 路径与查询串
    pub fn path(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// 请求/响应摘要：method, scheme, host, path, content_size, user_agent, status_code
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}, {}",
            self.method,
            self.url.scheme(),
            self.url.host_str().unwrap_or("-"),
            self.path(),
            self.content_size(),
            self.user_agent,
            self.status
        )
    }
}
