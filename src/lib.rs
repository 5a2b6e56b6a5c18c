//! # modutils - 批量并发执行与常用工具集
//!
//! 核心是一个有界并发的批量执行器：把同一个函数扇出到多组参数上，
//! 按块顺序执行、块内并发，结果按完成顺序返回，任何失败都会让整个调用失败。
//!
//! ## 模块
//! - `batch` - 批量执行器（参数集、选项、工作池、绑定包装）
//! - `http` - 带重试与状态码判定策略的 HTTP 会话
//! - `hash` - SHA-256 摘要类型与文件/目录扫描
//! - `utils` - echo 打印、pip 封装、嵌套取值、输出与进度条
//! - `cli` / `commands` - 命令行前端
//!
//! ## 依赖关系
//! ```text
//! commands/ ──> http/ ──> batch/ ──> utils/progress
//!          └──> hash/ ──┘
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod hash;
pub mod http;
pub mod utils;

pub use error::{Error, Result};
