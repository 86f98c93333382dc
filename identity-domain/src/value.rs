//! 记录属性值（Value）
//!
//! 存储侧记录的每个属性槽、属性记录的值以及查询参数的绑定值都用 `Value` 表达。
//! 比较语义贴近 SQL：`Null` 不参与大小比较，不同类型之间也不可比较。
//!
use crate::error::{IdentityError, IdentityResult};
use crate::model::Timestamp;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    Timestamp(Timestamp),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 值的类型名（用于错误信息）
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// 同类型非空值之间的顺序比较；`Null` 或类型不同返回 `None`
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// SQL 风格相等：任一侧为 `Null` 时不成立
    pub fn sql_eq(&self, other: &Value) -> bool {
        !self.is_null() && self == other
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

fn mismatch(expected: &str, found: &Value) -> IdentityError {
    IdentityError::invalid_value(format!("expected {expected}, found {}", found.kind()))
}

impl TryFrom<Value> for bool {
    type Error = IdentityError;

    fn try_from(value: Value) -> IdentityResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }
}

impl TryFrom<Value> for String {
    type Error = IdentityError;

    fn try_from(value: Value) -> IdentityResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl TryFrom<Value> for Timestamp {
    type Error = IdentityError;

    fn try_from(value: Value) -> IdentityResult<Self> {
        value.as_timestamp().ok_or_else(|| mismatch("timestamp", &value))
    }
}
