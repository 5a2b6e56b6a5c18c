//! # 嵌套取值
//!
//! 沿一串对象键在 JSON 文档中取值。
//!
//! ## 依赖关系
//! - 被 `commands/fetch.rs` 使用

use serde_json::Value;

/// 按键路径取值；任一键缺失或中间值不是对象时返回 `None`
pub fn nget<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// 同 `nget`，路径末端为 `null` 时也返回默认值
pub fn nget_or<'a>(value: &'a Value, keys: &[&str], default: &'a Value) -> &'a Value {
    match nget(value, keys) {
        Some(Value::Null) | None => default,
        Some(found) => found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nget() {
        let doc = json!({"a": {"b": {"c": 3}}, "list": [1, 2]});

        assert_eq!(nget(&doc, &["a", "b", "c"]), Some(&json!(3)));
        assert_eq!(nget(&doc, &["a", "x"]), None);
        assert_eq!(nget(&doc, &["list", "0"]), None);
        assert_eq!(nget(&json!([1]), &["a"]), None);
        assert_eq!(nget(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_nget_or_treats_null_as_missing() {
        let doc = json!({"a": {"b": null}});
        let fallback = json!("default");

        assert_eq!(nget_or(&doc, &["a", "b"], &fallback), &fallback);
        assert_eq!(nget_or(&doc, &["a", "z"], &fallback), &fallback);
        assert_eq!(nget_or(&doc, &["a"], &fallback), &json!({"b": null}));
    }
}
