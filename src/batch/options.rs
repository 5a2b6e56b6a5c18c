//! # 批量执行配置
//!
//! 执行器选项与调度上下文。
//!
//! ## 功能
//! - `BatchOptions`：并发上限、分块大小、进度显示
//! - `SchedulerContext`：可跨调用复用的 rayon 线程池
//! - 在调度任何任务之前校验配置
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/bulk.rs` 使用

use crate::error::{Error, Result};

use std::fmt;
use std::sync::Arc;

/// 默认并发上限
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;
/// 默认分块大小
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 100_000;
/// 默认进度条颜色
pub const DEFAULT_PROGRESS_COLOR: &str = "green";

/// 调度上下文
///
/// 包装一个共享的 rayon 线程池。rayon 线程池可安全地被多个调用
/// 并发使用；每次调用仍各自遵守自己的并发上限。
#[derive(Clone)]
pub struct SchedulerContext {
    pool: Arc<rayon::ThreadPool>,
}

impl SchedulerContext {
    /// 创建指定线程数的调度上下文
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("modutils-worker-{}", i))
            .build()?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// 复用已有线程池
    pub fn from_pool(pool: Arc<rayon::ThreadPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &rayon::ThreadPool {
        &self.pool
    }

    /// 线程池线程数
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl fmt::Debug for SchedulerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerContext")
            .field("threads", &self.threads())
            .finish()
    }
}

/// 批量执行选项
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 同时执行的调用数上限
    pub max_concurrency: usize,
    /// 每块最多派发的调用数
    pub max_chunk_size: usize,
    /// 是否显示进度条
    pub show_progress: bool,
    /// 进度条颜色（仅影响显示）
    pub progress_color: String,
    /// 自定义 indicatif 模板（仅影响显示，无法解析时退回默认模板）
    pub progress_format: Option<String>,
    /// 调用方提供的调度上下文；为空时每次调用临时创建
    pub scheduler: Option<SchedulerContext>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            show_progress: true,
            progress_color: DEFAULT_PROGRESS_COLOR.to_string(),
            progress_format: None,
            scheduler: None,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_progress_color(mut self, color: impl Into<String>) -> Self {
        self.progress_color = color.into();
        self
    }

    pub fn with_progress_format(mut self, format: impl Into<String>) -> Self {
        self.progress_format = Some(format.into());
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerContext) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        if self.max_chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
