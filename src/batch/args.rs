//! # 调用参数集
//!
//! 一次调用的输入：有序的位置参数 + 命名参数映射。
//!
//! ## 功能
//! - 显式构造（主 API）：`ArgumentSet::new().arg(..).named(..)`
//! - 兼容构造：`ArgumentSet::normalize` 将扁平值列表中的对象并入命名参数
//! - 类型化取值：位置参数或命名参数缺失、类型不符时返回
//!   `Error::MalformedArguments`
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 的调用方使用
//! - 使用 `serde_json::Value` 表示参数值

use crate::error::{Error, Result};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// 单次调用的参数集
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSet {
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl ArgumentSet {
    /// 创建空参数集
    pub fn new() -> Self {
        Self::default()
    }

    /// 由位置参数列表创建
    pub fn from_positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: Map::new(),
        }
    }

    /// 规范化扁平值列表
    ///
    /// 对象元素按出现顺序合并为命名参数（后出现的键覆盖先出现的），
    /// 其余元素保持原顺序作为位置参数。
    pub fn normalize<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut set = Self::new();
        for value in values {
            match value {
                Value::Object(map) => set.named.extend(map),
                other => set.positional.push(other),
            }
        }
        set
    }

    /// 追加位置参数
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// 设置命名参数
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }

    /// 在最前面插入位置参数
    pub fn prepend(mut self, value: impl Into<Value>) -> Self {
        self.positional.insert(0, value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_map(&self) -> &Map<String, Value> {
        &self.named
    }

    /// 拆分为 (位置参数, 命名参数)
    pub fn into_parts(self) -> (Vec<Value>, Map<String, Value>) {
        (self.positional, self.named)
    }

    /// 位置参数个数
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// 按索引取位置参数并反序列化
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let value = self.positional.get(index).ok_or_else(|| {
            Error::MalformedArguments(format!(
                "missing positional argument {} (got {})",
                index,
                self.positional.len()
            ))
        })?;
        T::deserialize(value).map_err(|e| {
            Error::MalformedArguments(format!("positional argument {}: {}", index, e))
        })
    }

    /// 取必需的命名参数
    pub fn get_named<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.get_named_opt(key)?
            .ok_or_else(|| Error::MalformedArguments(format!("missing named argument '{}'", key)))
    }

    /// 取可选的命名参数，缺失或为 null 时返回 `None`
    pub fn get_named_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.named.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value).map(Some).map_err(|e| {
                Error::MalformedArguments(format!("named argument '{}': {}", key, e))
            }),
        }
    }
}

impl From<Vec<Value>> for ArgumentSet {
    fn from(values: Vec<Value>) -> Self {
        Self::normalize(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_splits_objects_into_named() {
        let set = ArgumentSet::normalize(vec![
            json!("https://example.com"),
            json!({"params": {"q": "sky"}}),
            json!(3),
        ]);

        assert_eq!(set.positional(), &[json!("https://example.com"), json!(3)]);
        assert_eq!(set.named_map().get("params"), Some(&json!({"q": "sky"})));
    }

    #[test]
    fn test_normalize_later_keys_win() {
        let set = ArgumentSet::normalize(vec![
            json!({"a": 1, "b": 2}),
            json!(true),
            json!({"b": 3}),
        ]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get_named::<i64>("a").unwrap(), 1);
        assert_eq!(set.get_named::<i64>("b").unwrap(), 3);
    }

    #[test]
    fn test_typed_access() {
        let set = ArgumentSet::new().arg(2).arg("x").named("scale", 1.5);

        assert_eq!(set.get::<i64>(0).unwrap(), 2);
        assert_eq!(set.get::<String>(1).unwrap(), "x");
        assert_eq!(set.get_named::<f64>("scale").unwrap(), 1.5);
        assert_eq!(set.get_named_opt::<f64>("offset").unwrap(), None);
    }

    #[test]
    fn test_malformed_arguments() {
        let set = ArgumentSet::from_positional(vec!["not a number"]);

        assert!(matches!(set.get::<i64>(0), Err(Error::MalformedArguments(_))));
        assert!(matches!(set.get::<i64>(5), Err(Error::MalformedArguments(_))));
        assert!(matches!(
            set.get_named::<i64>("missing"),
            Err(Error::MalformedArguments(_))
        ));
    }

    #[test]
    fn test_prepend_owner() {
        let set = ArgumentSet::from_positional(vec![1, 2]).prepend("owner");
        let (positional, named) = set.into_parts();

        assert_eq!(positional, vec![json!("owner"), json!(1), json!(2)]);
        assert!(named.is_empty());
    }
}
