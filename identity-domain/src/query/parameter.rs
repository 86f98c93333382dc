//! 抽象查询参数（QueryParameter）与参数列表（IdentityQuery）
//!
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 可过滤维度
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryParameter {
    Enabled,
    CreatedDate,
    ExpiryDate,
    CreatedAfter,
    CreatedBefore,
    ExpiryAfter,
    ExpiryBefore,
    /// 多值属性匹配，携带属性名
    Attribute(String),
    /// 由其他层负责的参数（例如变体字段过滤），编译器不为其生成谓词
    Other(String),
}

impl QueryParameter {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::Other(name.into())
    }
}

impl fmt::Display for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParameter::Enabled => f.write_str("ENABLED"),
            QueryParameter::CreatedDate => f.write_str("CREATED_DATE"),
            QueryParameter::ExpiryDate => f.write_str("EXPIRY_DATE"),
            QueryParameter::CreatedAfter => f.write_str("CREATED_AFTER"),
            QueryParameter::CreatedBefore => f.write_str("CREATED_BEFORE"),
            QueryParameter::ExpiryAfter => f.write_str("EXPIRY_AFTER"),
            QueryParameter::ExpiryBefore => f.write_str("EXPIRY_BEFORE"),
            QueryParameter::Attribute(name) => write!(f, "ATTRIBUTE({name})"),
            QueryParameter::Other(name) => f.write_str(name),
        }
    }
}

/// 有序的（参数, 绑定值）列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityQuery {
    parameters: Vec<(QueryParameter, Vec<Value>)>,
}

impl IdentityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, V>(mut self, parameter: QueryParameter, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(parameter, values);
        self
    }

    pub fn push<I, V>(&mut self, parameter: QueryParameter, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.parameters
            .push((parameter, values.into_iter().map(Into::into).collect()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QueryParameter, &[Value])> {
        self.parameters.iter().map(|(p, v)| (p, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
