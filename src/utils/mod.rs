//! # 工具函数模块
//!
//! 提供美化输出、进度条、echo 打印、pip 封装、嵌套取值等工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `http/` 使用
//! - 子模块: echo, nget, output, pip, progress

pub mod echo;
pub mod nget;
pub mod output;
pub mod pip;
pub mod progress;
