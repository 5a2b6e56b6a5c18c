//! # 带重试的 HTTP 会话
//!
//! 包装 `reqwest` 阻塞客户端，状态码不在可接受集合内时线性重试。
//!
//! ## 功能
//! - get/head/put/post/patch/delete
//! - 重试直到状态码可接受，最多 `max_retries` 次重试
//! - 记录每个最终响应的摘要；verbose 时记录非 2xx 响应正文
//! - 批量请求：通过 `batch/` 执行器并发发送
//!
//! ## 依赖关系
//! - 使用 `http/response.rs`
//! - 使用 `batch/bulk.rs` 执行批量请求
//! - 使用 `tracing` 记录日志

use super::response::HttpResponse;
use crate::batch::{BatchOptions, MethodBulk};
use crate::error::{Error, Result};

use reqwest::blocking::Client;
use reqwest::{Method, Url};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, error, info};

/// 默认可接受的状态码
pub const DEFAULT_RESOLVE_STATUS_CODES: [u16; 13] =
    [200, 201, 202, 203, 204, 205, 206, 207, 208, 226, 400, 401, 404];

/// Basic 认证
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// 会话配置
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 状态码不可接受时的最大重试次数
    pub max_retries: u32,
    /// 每个主机保留的空闲连接数
    pub pool_maxsize: usize,
    /// 追加到默认集合的可接受状态码
    pub resolve_status_codes: Vec<u16>,
    /// 记录状态码 >= 300 的响应正文
    pub verbose: bool,
    pub auth: Option<BasicAuth>,
    /// 单次请求超时，`None` 表示不超时
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_retries: 3,
            pool_maxsize: 16,
            resolve_status_codes: Vec::new(),
            verbose: false,
            auth: None,
            timeout: None,
            user_agent: concat!("modutils/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SessionConfig {
    /// 用于批量请求的配置（更大的连接池）
    pub fn bulk() -> Self {
        SessionConfig {
            pool_maxsize: 32,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_resolve_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.resolve_status_codes.extend(codes);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// 请求正文
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Text(String),
}

/// 单个请求的附加选项
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    fn user_agent(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
            .map(|(_, value)| value.as_str())
    }
}

/// 批量请求中的一项
#[derive(Debug, Clone)]
pub struct BulkRequest {
    pub url: String,
    pub options: RequestOptions,
}

impl BulkRequest {
    pub fn new(url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }
}

impl From<&str> for BulkRequest {
    fn from(url: &str) -> Self {
        Self::new(url, RequestOptions::default())
    }
}

impl From<String> for BulkRequest {
    fn from(url: String) -> Self {
        Self::new(url, RequestOptions::default())
    }
}

/// 带重试的 HTTP 会话
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    config: SessionConfig,
    resolve: BTreeSet<u16>,
}

impl HttpSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_maxsize)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        let resolve = DEFAULT_RESOLVE_STATUS_CODES
            .iter()
            .chain(config.resolve_status_codes.iter())
            .copied()
            .collect();

        Ok(Self {
            client,
            config,
            resolve,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// 状态码是否可接受（不再重试）
    pub fn resolves(&self, status: u16) -> bool {
        self.resolve.contains(&status)
    }

    pub fn get(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.request(Method::GET, url, options)
    }

    pub fn head(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.request(Method::HEAD, url, options)
    }

    pub fn put(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.request(Method::PUT, url, options)
    }

    pub fn post(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.request(Method::POST, url, options)
    }

    pub fn patch(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.request(Method::PATCH, url, options)
    }

    pub fn delete(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.request(Method::DELETE, url, options)
    }

    /// 发送请求并按重试策略处理
    ///
    /// 最多发送 `1 + max_retries` 次。返回最后一次的响应（无论状态码），
    /// 最后一次仍是传输错误时返回该错误。
    pub fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut attempt = 1;
        let mut outcome = self.send_once(&method, &parsed, options);

        while attempt <= self.config.max_retries && self.should_retry(&outcome) {
            debug!(%method, url, attempt, "retrying request");
            outcome = self.send_once(&method, &parsed, options);
            attempt += 1;
        }

        let response = outcome?;
        self.log_response(&response);
        Ok(response)
    }

    fn should_retry(&self, outcome: &Result<HttpResponse>) -> bool {
        match outcome {
            Ok(response) => !self.resolves(response.status()),
            // 请求构造失败（如非法请求头）不重试
            Err(Error::Http(e)) => !e.is_builder(),
            Err(_) => false,
        }
    }

    fn send_once(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        let mut builder = self.client.request(method.clone(), url.clone());

        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        builder = match &options.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Text(body)) => builder.body(body.clone()),
            None => builder,
        };
        if let Some(auth) = &self.config.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let user_agent = options
            .user_agent()
            .unwrap_or(&self.config.user_agent)
            .to_string();
        let response = builder.send()?;
        HttpResponse::read(method.clone(), user_agent, response)
    }

    fn log_response(&self, response: &HttpResponse) {
        info!(target: "modutils::http", "{}", response.summary());
        if response.status() >= 300 && self.config.verbose {
            error!(target: "modutils::http", "RESPONSE: {}", response.text());
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 批量请求
    // ─────────────────────────────────────────────────────────────

    pub fn get_bulk(
        &self,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        self.bulk(Method::GET, requests, options)
    }

    pub fn head_bulk(
        &self,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        self.bulk(Method::HEAD, requests, options)
    }

    pub fn put_bulk(
        &self,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        self.bulk(Method::PUT, requests, options)
    }

    pub fn post_bulk(
        &self,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        self.bulk(Method::POST, requests, options)
    }

    pub fn patch_bulk(
        &self,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        self.bulk(Method::PATCH, requests, options)
    }

    pub fn delete_bulk(
        &self,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        self.bulk(Method::DELETE, requests, options)
    }

    /// 并发发送一批同方法请求，结果按完成顺序返回
    pub fn bulk(
        &self,
        method: Method,
        requests: Vec<BulkRequest>,
        options: &BatchOptions,
    ) -> Result<Vec<HttpResponse>> {
        MethodBulk::new(move |session: &HttpSession, request: BulkRequest| {
            session.request(method.clone(), &request.url, &request.options)
        })
        .bulk_with(self, requests, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quiet() -> BatchOptions {
        BatchOptions::default().with_progress(false)
    }

    #[test]
    fn test_default_resolve_codes() {
        let session = HttpSession::new(SessionConfig::default()).unwrap();
        assert!(session.resolves(200));
        assert!(session.resolves(404));
        assert!(!session.resolves(500));
        assert!(!session.resolves(503));

        let session =
            HttpSession::new(SessionConfig::default().with_resolve_status_codes([503])).unwrap();
        assert!(session.resolves(503));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_retries_until_resolved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let url = format!("{}/flaky", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let session = HttpSession::new(SessionConfig::default())?;
            session.get(&url, &RequestOptions::default())
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.text(), "ok");
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_retries_capped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = format!("{}/down", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let session = HttpSession::new(SessionConfig::default().with_max_retries(2))?;
            session.get(&url, &RequestOptions::default())
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/gone", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let session = HttpSession::new(SessionConfig::default())?;
            session.delete(&url, &RequestOptions::default())
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_auth_query_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(query_param("q", "sky"))
            .and(header("authorization", "Basic dXNlcjpwYXNz"))
            .and(body_json(json!({"limit": 5})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"hits": 2})))
            .mount(&server)
            .await;

        let url = format!("{}/search", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let config = SessionConfig::default().with_basic_auth("user", "pass");
            let session = HttpSession::new(config)?;
            let options = RequestOptions::new()
                .query("q", "sky")
                .header("User-Agent", "bulk-tester")
                .json(json!({"limit": 5}));
            session.post(&url, &options)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.user_agent(), "bulk-tester");
        assert_eq!(response.json::<Value>().unwrap()["hits"], 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_bulk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("item"))
            .mount(&server)
            .await;

        let base = server.uri();
        let responses = tokio::task::spawn_blocking(move || {
            let session = HttpSession::new(SessionConfig::bulk())?;
            let requests: Vec<BulkRequest> =
                (0..6).map(|i| BulkRequest::from(format!("{}/items/{}", base, i))).collect();
            session.get_bulk(requests, &quiet().with_max_concurrency(3))
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(responses.len(), 6);
        assert!(responses.iter().all(|r| r.status() == 200));
        let mut paths: Vec<String> = responses.iter().map(|r| r.path()).collect();
        paths.sort();
        assert_eq!(paths[0], "/items/0");
        assert_eq!(paths[5], "/items/5");
    }

    #[test]
    fn test_invalid_url_fails_without_retry() {
        let session = HttpSession::new(SessionConfig::default()).unwrap();
        let outcome = session.get("not a url", &RequestOptions::default());
        assert!(matches!(outcome, Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_bulk_propagates_transport_error() {
        let session = HttpSession::new(SessionConfig::default().with_max_retries(0)).unwrap();
        let outcome = session.head_bulk(
            vec![BulkRequest::from("http://127.0.0.1:1/unreachable")],
            &quiet(),
        );
        assert!(matches!(outcome, Err(Error::Http(_))));
    }
}
