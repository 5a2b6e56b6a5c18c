//! # HTTP 模块
//!
//! 带重试/状态码判定策略的 HTTP 会话。
//!
//! ## 依赖关系
//! - 被 `commands/fetch.rs`, `utils/echo.rs` 使用
//! - 使用 `batch/` 执行批量请求
//! - 子模块: session, response

pub mod response;
pub mod session;

pub use response::HttpResponse;
pub use session::{
    BasicAuth, BulkRequest, HttpSession, RequestBody, RequestOptions, SessionConfig,
    DEFAULT_RESOLVE_STATUS_CODES,
};
