//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔多模式）
//! - 可选递归目录搜索
//! - 结果按路径排序，保证批次顺序稳定
//!
//! ## 依赖关系
//! - 被 `hash/scanner.rs` 和 `commands/hash.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{Error, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
#[derive(Debug, Clone)]
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器（默认匹配所有文件，不递归）
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "*")
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    Error::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.patterns.iter().any(|p| p.matches(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_with_patterns() {
        let tmp = tempdir().expect("create temp dir");
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("b.log"), "b").unwrap();
        fs::write(tmp.path().join("c.bin"), "c").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("d.txt"), "d").unwrap();

        let all = FileCollector::new(tmp.path()).collect();
        assert_eq!(all.len(), 3);

        let text = FileCollector::new(tmp.path())
            .with_pattern("*.txt, *.log")
            .unwrap()
            .collect();
        assert_eq!(text, vec![tmp.path().join("a.txt"), tmp.path().join("b.log")]);

        let deep = FileCollector::new(tmp.path())
            .with_pattern("*.txt")
            .unwrap()
            .recursive(true)
            .collect();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_single_file_and_missing_input() {
        let tmp = tempdir().expect("create temp dir");
        let file = tmp.path().join("only.txt");
        fs::write(&file, "x").unwrap();

        assert_eq!(FileCollector::new(&file).collect(), vec![file]);
        assert!(FileCollector::new(tmp.path().join("missing")).collect().is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let outcome = FileCollector::new(".").with_pattern("[z-a");
        assert!(matches!(outcome, Err(Error::InvalidArgument(_))));
    }
}
