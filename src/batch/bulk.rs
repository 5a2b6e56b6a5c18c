//! # 批量绑定包装器
//!
//! 把函数与一组默认执行选项绑定一次，之后既可单次调用，
//! 也可在不同批次上批量调用。
//!
//! ## 功能
//! - `Bulk`：普通函数，`call(args)` / `bulk(batch)`
//! - `MethodBulk`：以宿主对象为首个参数的函数，调用方显式传入宿主，
//!   每次调用都会收到该宿主
//!
//! ## 依赖关系
//! - 被 `http/session.rs` 使用
//! - 使用 `batch/runner.rs` 的 `run_batch`

use super::options::BatchOptions;
use super::runner::run_batch;
use crate::error::Error;

/// 绑定了默认执行选项的函数
///
/// ```ignore
/// let add = Bulk::new(|(x, y): (i64, i64)| -> modutils::Result<i64> { Ok(x + y) });
/// assert_eq!(add.call((1, 2))?, 3);
/// let sums = add.bulk(vec![(0, 5), (1, 6), (2, 7)])?;
/// ```
#[derive(Debug, Clone)]
pub struct Bulk<F> {
    function: F,
    options: BatchOptions,
}

impl<F> Bulk<F> {
    pub fn new(function: F) -> Self {
        Self {
            function,
            options: BatchOptions::default(),
        }
    }

    /// 替换默认执行选项
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// 单次调用
    pub fn call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
    {
        (self.function)(args)
    }

    /// 使用默认选项批量调用
    pub fn bulk<A, T, E>(&self, batch: Vec<A>) -> Result<Vec<T>, E>
    where
        A: Send,
        T: Send,
        E: Send + From<Error>,
        F: Fn(A) -> Result<T, E> + Sync,
    {
        self.bulk_with(batch, &self.options)
    }

    /// 使用指定选项批量调用
    pub fn bulk_with<A, T, E>(&self, batch: Vec<A>, options: &BatchOptions) -> Result<Vec<T>, E>
    where
        A: Send,
        T: Send,
        E: Send + From<Error>,
        F: Fn(A) -> Result<T, E> + Sync,
    {
        run_batch(&self.function, batch, options)
    }
}

/// 以宿主对象为首个参数的绑定函数
#[derive(Debug, Clone)]
pub struct MethodBulk<F> {
    function: F,
    options: BatchOptions,
}

impl<F> MethodBulk<F> {
    pub fn new(function: F) -> Self {
        Self {
            function,
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// 单次调用
    pub fn call<S, A, T, E>(&self, owner: &S, args: A) -> Result<T, E>
    where
        S: ?Sized,
        F: Fn(&S, A) -> Result<T, E>,
    {
        (self.function)(owner, args)
    }

    /// 使用默认选项批量调用，每次调用都收到 `owner`
    pub fn bulk<S, A, T, E>(&self, owner: &S, batch: Vec<A>) -> Result<Vec<T>, E>
    where
        S: Sync + ?Sized,
        A: Send,
        T: Send,
        E: Send + From<Error>,
        F: Fn(&S, A) -> Result<T, E> + Sync,
    {
        self.bulk_with(owner, batch, &self.options)
    }

    /// 使用指定选项批量调用
    pub fn bulk_with<S, A, T, E>(
        &self,
        owner: &S,
        batch: Vec<A>,
        options: &BatchOptions,
    ) -> Result<Vec<T>, E>
    where
        S: Sync + ?Sized,
        A: Send,
        T: Send,
        E: Send + From<Error>,
        F: Fn(&S, A) -> Result<T, E> + Sync,
    {
        let function = &self.function;
        run_batch(|args| function(owner, args), batch, options)
    }
}
