//! # SHA-256 摘要类型
//!
//! 经过校验的 64 位十六进制摘要，比较时忽略大小写，显示为小写。
//!
//! ## 依赖关系
//! - 被 `hash/scanner.rs` 使用
//! - 使用 `sha2`, `hex` 计算摘要

use crate::error::{Error, Result};

use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// 摘要长度（十六进制字符数）
pub const SHA256_HEX_LEN: usize = 64;

/// 在文本中查找摘要的模式（大小写不敏感，可能重复）
pub fn sha256_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Fa-f0-9]{64}").expect("static sha256 pattern"))
}

/// SHA-256 摘要
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// 校验并创建摘要，整个值必须恰好是 64 个十六进制字符
    pub fn new(value: &str) -> Result<Self> {
        if value.len() == SHA256_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(Error::InvalidDigest {
                value: value.to_string(),
            })
        }
    }

    /// 计算字节数据的摘要
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    pub(crate) fn from_hasher(hasher: Sha256) -> Self {
        Self(hex::encode(hasher.finalize()))
    }

    /// 小写十六进制字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sha256Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl PartialEq<str> for Sha256Digest {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for Sha256Digest {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}
