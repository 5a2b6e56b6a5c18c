//! # 摘要扫描器
//!
//! 从文件/目录中提取已有的 SHA-256 摘要，或计算文件内容的摘要。
//!
//! ## 功能
//! - 提取：正则匹配文本中的 64 位十六进制串，去重
//! - 计算：流式读取文件并计算 SHA-256
//! - 目录：仅处理目录下一层的普通文件
//! - 缺失路径：默认返回空结果，`raise_on_missing` 时返回错误
//! - 多文件并行计算（使用批量执行器）
//!
//! ## 依赖关系
//! - 被 `commands/hash.rs` 使用
//! - 使用 `batch/collector.rs` 列出文件，`batch/runner.rs` 并行计算
//! - 使用 `hash/digest.rs`

use super::digest::{sha256_pattern, Sha256Digest};
use crate::batch::{run_batch, BatchOptions, FileCollector};
use crate::error::{Error, Result};

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// 扫描配置
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// 文件或目录不存在时返回错误而不是空结果
    pub raise_on_missing: bool,
}

impl ScanConfig {
    pub fn strict() -> Self {
        Self {
            raise_on_missing: true,
        }
    }
}

/// 摘要扫描器
#[derive(Debug, Clone, Default)]
pub struct DigestScanner {
    config: ScanConfig,
}

impl DigestScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 提取文件中出现的所有摘要（去重，保持首次出现顺序）
    pub fn from_file(&self, path: &Path) -> Result<Vec<Sha256Digest>> {
        if !path.is_file() {
            return self.missing_file(path);
        }

        let bytes = fs::read(path).map_err(|e| Error::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let mut seen = HashSet::new();
        let mut digests = Vec::new();
        for found in sha256_pattern().find_iter(&text) {
            let digest = Sha256Digest::new(found.as_str())?;
            if seen.insert(digest.clone()) {
                digests.push(digest);
            }
        }
        Ok(digests)
    }

    /// 提取目录下所有文件中的摘要
    pub fn from_dir(&self, dir: &Path) -> Result<Vec<Sha256Digest>> {
        let mut digests = Vec::new();
        for file in self.files_in(dir)? {
            digests.extend(self.from_file(&file)?);
        }
        Ok(digests)
    }

    /// 提取目录下每个文件中的摘要，按文件路径映射
    pub fn from_dir_map(&self, dir: &Path) -> Result<BTreeMap<PathBuf, Vec<Sha256Digest>>> {
        let mut map = BTreeMap::new();
        for file in self.files_in(dir)? {
            let digests = self.from_file(&file)?;
            map.insert(file, digests);
        }
        Ok(map)
    }

    /// 计算单个文件内容的摘要
    ///
    /// 单个目标没有“空结果”可返回，文件不存在时总是返回
    /// `FileNotFound`，与 `raise_on_missing` 无关。
    pub fn calc_file(&self, path: &Path) -> Result<Sha256Digest> {
        let read_error = |e: io::Error| Error::FileReadError {
            path: path.display().to_string(),
            source: e,
        };

        let mut file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                read_error(e)
            }
        })?;

        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher).map_err(read_error)?;
        Ok(Sha256Digest::from_hasher(hasher))
    }

    /// 计算目录下所有文件的摘要
    pub fn calc_from_dir(&self, dir: &Path) -> Result<Vec<Sha256Digest>> {
        self.files_in(dir)?
            .iter()
            .map(|file| self.calc_file(file))
            .collect()
    }

    /// 计算目录下所有文件的摘要，按文件路径映射
    pub fn calc_from_dir_map(&self, dir: &Path) -> Result<BTreeMap<PathBuf, Sha256Digest>> {
        self.files_in(dir)?
            .into_iter()
            .map(|file| {
                let digest = self.calc_file(&file)?;
                Ok((file, digest))
            })
            .collect()
    }

    /// 并行计算多个文件的摘要（结果为完成顺序）
    pub fn calc_files(
        &self,
        files: Vec<PathBuf>,
        options: &BatchOptions,
    ) -> Result<Vec<(PathBuf, Sha256Digest)>> {
        run_batch(
            |file: PathBuf| -> Result<(PathBuf, Sha256Digest)> {
                let digest = self.calc_file(&file)?;
                Ok((file, digest))
            },
            files,
            options,
        )
    }

    /// 并行提取多个文件中的摘要（结果为完成顺序）
    pub fn extract_files(
        &self,
        files: Vec<PathBuf>,
        options: &BatchOptions,
    ) -> Result<Vec<(PathBuf, Vec<Sha256Digest>)>> {
        run_batch(
            |file: PathBuf| -> Result<(PathBuf, Vec<Sha256Digest>)> {
                let digests = self.from_file(&file)?;
                Ok((file, digests))
            },
            files,
            options,
        )
    }

    /// 列出目录下一层的普通文件
    fn files_in(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            if self.config.raise_on_missing {
                return Err(Error::DirectoryNotFound {
                    path: dir.display().to_string(),
                });
            }
            return Ok(Vec::new());
        }
        Ok(FileCollector::new(dir).collect())
    }

    fn missing_file<T: Default>(&self, path: &Path) -> Result<T> {
        if self.config.raise_on_missing {
            Err(Error::FileNotFound {
                path: path.display().to_string(),
            })
        } else {
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn quiet() -> BatchOptions {
        BatchOptions::default().with_progress(false)
    }

    #[test]
    fn test_from_file_dedupes() {
        let tmp = tempdir().expect("create temp dir");
        let file = tmp.path().join("sums.txt");
        fs::write(
            &file,
            format!("{}  a.bin\n{}  b.bin\n{}  c.bin\n", EMPTY, ABC, EMPTY.to_uppercase()),
        )
        .unwrap();

        let digests = DigestScanner::default().from_file(&file).unwrap();
        assert_eq!(digests.len(), 2);
        assert_eq!(digests[0], EMPTY);
        assert_eq!(digests[1], ABC);
    }

    #[test]
    fn test_missing_paths() {
        let tmp = tempdir().expect("create temp dir");
        let missing = tmp.path().join("missing");

        let lenient = DigestScanner::default();
        assert!(lenient.from_file(&missing).unwrap().is_empty());
        assert!(matches!(
            lenient.calc_file(&missing),
            Err(Error::FileNotFound { .. })
        ));
        assert!(lenient.from_dir(&missing).unwrap().is_empty());
        assert!(lenient.calc_from_dir_map(&missing).unwrap().is_empty());

        let strict = DigestScanner::new(ScanConfig::strict());
        assert!(matches!(
            strict.from_file(&missing),
            Err(Error::FileNotFound { .. })
        ));
        assert!(matches!(
            strict.from_dir(&missing),
            Err(Error::DirectoryNotFound { .. })
        ));
        assert!(matches!(
            strict.calc_file(&missing),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_dir_scans() {
        let tmp = tempdir().expect("create temp dir");
        fs::write(tmp.path().join("empty.bin"), b"").unwrap();
        fs::write(tmp.path().join("abc.bin"), b"abc").unwrap();
        fs::write(tmp.path().join("list.txt"), format!("sum={}", ABC)).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("skip.txt"), EMPTY).unwrap();

        let scanner = DigestScanner::default();

        let extracted = scanner.from_dir(tmp.path()).unwrap();
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0], ABC);

        let map = scanner.from_dir_map(tmp.path()).unwrap();
        assert_eq!(map.len(), 3);
        assert!(map[&tmp.path().join("empty.bin")].is_empty());

        let calculated = scanner.calc_from_dir_map(tmp.path()).unwrap();
        assert_eq!(calculated[&tmp.path().join("empty.bin")], EMPTY);
        assert_eq!(calculated[&tmp.path().join("abc.bin")], ABC);
        assert_eq!(scanner.calc_from_dir(tmp.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_parallel_calc_matches_serial() {
        let tmp = tempdir().expect("create temp dir");
        let files: Vec<PathBuf> = (0..8)
            .map(|i| {
                let path = tmp.path().join(format!("f{}.dat", i));
                fs::write(&path, format!("payload {}", i)).unwrap();
                path
            })
            .collect();

        let scanner = DigestScanner::default();
        let parallel: BTreeMap<PathBuf, Sha256Digest> = scanner
            .calc_files(files.clone(), &quiet().with_max_concurrency(4))
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(parallel, scanner.calc_from_dir_map(tmp.path()).unwrap());
    }

    #[test]
    fn test_parallel_fails_fast_on_missing_file() {
        let tmp = tempdir().expect("create temp dir");
        let scanner = DigestScanner::new(ScanConfig::strict());
        let outcome = scanner.extract_files(vec![tmp.path().join("nope.txt")], &quiet());
        assert!(matches!(outcome, Err(Error::FileNotFound { .. })));
    }
}
