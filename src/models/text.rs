//! 文本字段的宽松读取
//!
//! 快照、请求体和环境变量中的学号、密码等字段可能被写成数字，
//! 比较时统一按文本处理，保证 `1` 与 `"1"` 相等。

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<Loose> for String {
    fn from(value: Loose) -> Self {
        match value {
            Loose::Text(s) => s,
            Loose::Number(n) => n.to_string(),
            Loose::Bool(b) => b.to_string(),
        }
    }
}

/// 已存储 JSON 值的文本视图，`null`、数组和对象没有文本视图
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// 将字符串、数字或布尔值读成 `Option<String>`，`null` 读成 `None`
pub fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.map(String::from))
}

/// 将字符串、数字或布尔值读成 `String`
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.into())
}

/// 只接受字符串，其他类型一律读成 `None`
pub fn deserialize_opt_string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
