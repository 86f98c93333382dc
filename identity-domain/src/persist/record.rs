//! 存储侧记录（Record）
//!
//! 身份记录与属性记录都只通过“属性名 -> 值”的槽位访问，映射代码因此无需知道
//! 具体记录类型的字段形态。`GenericRecord` 是基于有序映射的默认实现。
//!
use crate::error::IdentityResult;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 通用记录协议
pub trait Record: Send + Sync {
    /// 读取属性；未设置返回 `None`
    fn property(&self, name: &str) -> Option<&Value>;

    /// 写入属性；具体记录类型可以拒绝未知属性或不匹配的值
    fn set_property(&mut self, name: &str, value: Value) -> IdentityResult<()>;
}

/// 记录实例工厂：分配一个空记录，失败视为致命的配置错误
pub type RecordFactory<R> = Arc<dyn Fn() -> IdentityResult<R> + Send + Sync>;

/// 基于有序映射的通用记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericRecord {
    properties: BTreeMap<String, Value>,
}

impl GenericRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式设置属性（用于构造测试数据或手工记录）
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Record for GenericRecord {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> IdentityResult<()> {
        self.properties.insert(name.to_string(), value);
        Ok(())
    }
}
