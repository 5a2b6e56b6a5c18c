//! # hash 命令实现
//!
//! 计算文件/目录中各文件的 SHA-256，或提取文件中已有的摘要。
//!
//! ## 功能
//! - 单文件：直接计算/提取
//! - 目录：按 glob 模式收集文件，经批量执行器并行处理
//! - 输出：`sha256sum` 风格的行，或文件到摘要的表格
//!
//! ## 依赖关系
//! - 使用 `cli/hash.rs` 定义的参数
//! - 使用 `hash/`, `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchOptions, FileCollector};
use crate::cli::hash::HashArgs;
use crate::error::{Error, Result};
use crate::hash::{DigestScanner, ScanConfig, Sha256Digest};
use crate::utils::output;

use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct DigestRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "SHA-256")]
    digest: String,
}

/// 执行 hash 命令
pub fn execute(args: HashArgs) -> Result<()> {
    let entries = scan(&args)?;

    if entries.is_empty() {
        output::print_warning(&format!("No digests for '{}'", args.path.display()));
        return Ok(());
    }

    if args.map {
        let rows: Vec<DigestRow> = entries
            .iter()
            .map(|(file, digest)| DigestRow {
                file: file.display().to_string(),
                digest: digest.to_string(),
            })
            .collect();
        println!("{}", Table::new(&rows));
    } else if args.extract {
        for digest in unique_digests(&entries) {
            println!("{}", digest);
        }
    } else {
        for (file, digest) in &entries {
            println!("{}  {}", digest, file.display());
        }
    }

    output::print_done(&format!("{} digest(s)", entries.len()));
    Ok(())
}

/// 扫描路径，返回按文件路径排序的 (文件, 摘要) 列表
fn scan(args: &HashArgs) -> Result<Vec<(PathBuf, Sha256Digest)>> {
    let scanner = DigestScanner::new(ScanConfig {
        raise_on_missing: args.strict,
    });

    if args.path.is_file() {
        return scan_file(&scanner, &args.path, args.extract);
    }

    if !args.path.is_dir() {
        if args.strict {
            return Err(Error::FileNotFound {
                path: args.path.display().to_string(),
            });
        }
        return Ok(Vec::new());
    }

    let files = FileCollector::new(&args.path)
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();
    output::print_info(&format!("Found {} file(s)", files.len()));

    let options = batch_options(args);
    let mut entries: Vec<(PathBuf, Sha256Digest)> = if args.extract {
        scanner
            .extract_files(files, &options)?
            .into_iter()
            .flat_map(|(file, digests)| digests.into_iter().map(move |d| (file.clone(), d)))
            .collect()
    } else {
        scanner.calc_files(files, &options)?
    };

    // 批量结果为完成顺序
    entries.sort();
    Ok(entries)
}

fn scan_file(
    scanner: &DigestScanner,
    path: &Path,
    extract: bool,
) -> Result<Vec<(PathBuf, Sha256Digest)>> {
    if extract {
        Ok(scanner
            .from_file(path)?
            .into_iter()
            .map(|d| (path.to_path_buf(), d))
            .collect())
    } else {
        Ok(vec![(path.to_path_buf(), scanner.calc_file(path)?)])
    }
}

fn batch_options(args: &HashArgs) -> BatchOptions {
    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    BatchOptions::default()
        .with_max_concurrency(jobs)
        .with_progress(!args.no_progress)
}

/// 去重后的摘要（保持首次出现顺序）
fn unique_digests(entries: &[(PathBuf, Sha256Digest)]) -> Vec<&Sha256Digest> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .map(|(_, digest)| digest)
        .filter(|digest| seen.insert(*digest))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn args(path: &Path) -> HashArgs {
        HashArgs {
            path: path.to_path_buf(),
            extract: false,
            map: false,
            strict: false,
            pattern: "*".to_string(),
            recursive: false,
            jobs: 2,
            no_progress: true,
        }
    }

    #[test]
    fn test_scan_directory_is_sorted() {
        let tmp = tempdir().expect("create temp dir");
        for name in ["c.bin", "a.bin", "b.bin"] {
            fs::write(tmp.path().join(name), b"abc").unwrap();
        }
        fs::write(tmp.path().join("notes.txt"), b"skip").unwrap();

        let mut hash_args = args(tmp.path());
        hash_args.pattern = "*.bin".to_string();
        let entries = scan(&hash_args).unwrap();

        let names: Vec<_> = entries
            .iter()
            .map(|(f, _)| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.bin", "b.bin", "c.bin"]);
        assert!(entries.iter().all(|(_, d)| d == &ABC));
    }

    #[test]
    fn test_scan_extract_dedupes_output() {
        let tmp = tempdir().expect("create temp dir");
        fs::write(tmp.path().join("one.txt"), format!("{} x", ABC)).unwrap();
        fs::write(tmp.path().join("two.txt"), format!("{} y", ABC.to_uppercase())).unwrap();

        let mut hash_args = args(tmp.path());
        hash_args.extract = true;
        let entries = scan(&hash_args).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(unique_digests(&entries).len(), 1);
    }

    #[test]
    fn test_scan_missing_path() {
        let tmp = tempdir().expect("create temp dir");
        let missing = tmp.path().join("missing");

        assert!(scan(&args(&missing)).unwrap().is_empty());

        let mut strict = args(&missing);
        strict.strict = true;
        assert!(matches!(scan(&strict), Err(Error::FileNotFound { .. })));
    }
}
