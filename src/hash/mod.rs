//! # 摘要模块
//!
//! SHA-256 摘要类型与文件/目录摘要扫描。
//!
//! ## 依赖关系
//! - 被 `commands/hash.rs` 使用
//! - 子模块: digest, scanner

pub mod digest;
pub mod scanner;

pub use digest::{sha256_pattern, Sha256Digest};
pub use scanner::{DigestScanner, ScanConfig};
