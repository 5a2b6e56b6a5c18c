//! # 批量处理模块
//!
//! 有界并发的批量执行器：把一个函数扇出到多组参数上。
//!
//! ## 功能
//! - 参数集规范化（位置参数 + 命名参数）
//! - 有界工作池与分块派发
//! - 按完成顺序收集结果，快速失败
//! - 进度反馈
//! - 函数与默认选项的绑定包装
//! - 收集匹配文件列表作为批次输入
//!
//! ## 依赖关系
//! - 被 `http/`, `hash/`, `commands/` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod args;
pub mod bulk;
pub mod collector;
pub mod options;
pub mod runner;

pub use args::ArgumentSet;
pub use bulk::{Bulk, MethodBulk};
pub use collector::FileCollector;
pub use options::{BatchOptions, SchedulerContext};
pub use runner::{run_batch, BatchRunner};
