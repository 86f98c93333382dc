use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 身份的开放属性集合：一个属性名可对应多个值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Vec<Value>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆盖属性的全部值；传入空列表等同于移除
    pub fn set<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let name = name.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.0.remove(&name);
        } else {
            self.0.insert(name, values);
        }
    }

    /// 追加一个值
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Value>> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
