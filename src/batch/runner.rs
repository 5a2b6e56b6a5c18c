//! # 批量执行器
//!
//! 在有界工作池上把一个函数扇出到多组参数，并按完成顺序收集结果。
//!
//! ## 功能
//! - 并发上限：任一时刻最多 `max_concurrency` 个调用在执行
//! - 分块：每块最多 `max_chunk_size` 个调用，块与块严格串行
//! - 块内按完成顺序收集结果，每完成一个调用推进一次进度条
//! - 快速失败：块内任一调用失败时，等待同块其余调用结束后返回该错误，
//!   后续块不再启动
//!
//! ## 依赖关系
//! - 被 `batch/bulk.rs`, `http/session.rs`, `commands/` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 线程池作为调度上下文

use super::options::{BatchOptions, SchedulerContext};
use crate::error::{Error, Result};
use crate::utils::progress;

use indicatif::ProgressBar;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// 在批量参数上执行 `function`
///
/// 返回值按块顺序排列，块内为完成顺序。`max_concurrency == 1` 时
/// 结果顺序与提交顺序一致。
///
/// 任务错误原样返回；执行器自身的错误（配置非法、线程池创建失败）
/// 经 `From<Error>` 转换为调用方的错误类型。
pub fn run_batch<A, T, E, F>(
    function: F,
    batch: Vec<A>,
    options: &BatchOptions,
) -> std::result::Result<Vec<T>, E>
where
    A: Send,
    T: Send,
    E: Send + From<Error>,
    F: Fn(A) -> std::result::Result<T, E> + Sync,
{
    options.validate()?;

    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let total = batch.len();
    let chunk_count = total.div_ceil(options.max_chunk_size);
    let pool = WorkerPool::acquire(options)?;
    let pb = progress::create_batch_bar(
        total as u64,
        options.show_progress,
        &options.progress_color,
        options.progress_format.as_deref(),
    );

    debug!(
        total,
        chunks = chunk_count,
        slots = pool.slots,
        threads = pool.context.threads(),
        "starting batch"
    );

    let mut results = Vec::with_capacity(total);
    let mut pending = batch.into_iter();

    for index in 0..chunk_count {
        let chunk: Vec<A> = pending.by_ref().take(options.max_chunk_size).collect();
        debug!(chunk = index, size = chunk.len(), "dispatching chunk");

        match pool.run_chunk(&function, chunk, &pb) {
            Ok(values) => results.extend(values),
            Err(e) => {
                pb.abandon();
                debug!(chunk = index, "chunk failed, stopping batch");
                return Err(e);
            }
        }
    }

    pb.finish_and_clear();
    Ok(results)
}

/// 单次批量调用独占的有界工作池
///
/// 在第一块之前获取，最后一块之后（或失败时）随 drop 释放。
/// 未提供调度上下文时临时创建线程池，释放时一并关闭。
struct WorkerPool {
    context: SchedulerContext,
    slots: usize,
}

impl WorkerPool {
    fn acquire(options: &BatchOptions) -> Result<Self> {
        let context = match &options.scheduler {
            Some(shared) => shared.clone(),
            None => SchedulerContext::new(options.max_concurrency)?,
        };
        Ok(Self {
            context,
            slots: options.max_concurrency,
        })
    }

    /// 执行一块并等待其全部调用结束
    ///
    /// 每个槽位是一个循环取任务的 worker，槽位数即并发上限，
    /// 与底层线程池大小无关。
    fn run_chunk<A, T, E, F>(
        &self,
        function: &F,
        chunk: Vec<A>,
        pb: &ProgressBar,
    ) -> std::result::Result<Vec<T>, E>
    where
        A: Send,
        T: Send,
        E: Send,
        F: Fn(A) -> std::result::Result<T, E> + Sync,
    {
        let len = chunk.len();
        let queue = Mutex::new(chunk.into_iter());
        let (tx, rx) = mpsc::channel();
        let senders: Vec<_> = (0..self.slots.min(len)).map(|_| tx.clone()).collect();
        drop(tx);

        self.context.pool().scope(|scope| {
            for tx in senders {
                let queue = &queue;
                scope.spawn(move |_| loop {
                    let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                    let Some(args) = next else {
                        break;
                    };
                    let outcome = function(args);
                    pb.inc(1);
                    if tx.send(outcome).is_err() {
                        break;
                    }
                });
            }
        });

        // scope 返回时所有调用都已结束，通道里的顺序即完成顺序
        let mut values = Vec::with_capacity(len);
        let mut failure = None;
        for outcome in rx {
            match outcome {
                Ok(value) => values.push(value),
                Err(e) => {
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(values),
        }
    }
}

/// 可复用的批量执行器
///
/// 持有共享调度上下文和默认选项，适合在同一线程池上执行多批任务。
#[derive(Debug, Clone)]
pub struct BatchRunner {
    options: BatchOptions,
}

impl BatchRunner {
    /// 创建新的批量执行器（`jobs == 0` 时使用 CPU 核数）
    pub fn new(jobs: usize) -> Result<Self> {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self::with_options(BatchOptions::default().with_max_concurrency(jobs))
    }

    /// 以给定选项创建，未提供调度上下文时按并发上限创建一个
    pub fn with_options(mut options: BatchOptions) -> Result<Self> {
        options.validate()?;
        if options.scheduler.is_none() {
            options.scheduler = Some(SchedulerContext::new(options.max_concurrency)?);
        }
        Ok(Self { options })
    }

    /// 设置是否显示进度条
    pub fn show_progress(mut self, show: bool) -> Self {
        self.options.show_progress = show;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// 并行处理一批参数
    pub fn run<A, T, E, F>(&self, batch: Vec<A>, function: F) -> std::result::Result<Vec<T>, E>
    where
        A: Send,
        T: Send,
        E: Send + From<Error>,
        F: Fn(A) -> std::result::Result<T, E> + Sync,
    {
        run_batch(function, batch, &self.options)
    }
}
