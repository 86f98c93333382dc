use crate::model::Timestamp;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 事件元数据：事件针对哪一个身份
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[builder(into)]
    identity_key: String,
    /// 身份变体的鉴别值
    #[builder(into)]
    identity_type: String,
    /// 所在分区标识，未分区为 `None`
    partition_id: Option<String>,
    occurred_at: Timestamp,
}

impl Metadata {
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    pub fn identity_type(&self) -> &str {
        &self.identity_type
    }

    pub fn partition_id(&self) -> Option<&str> {
        self.partition_id.as_deref()
    }

    pub fn occurred_at(&self) -> &Timestamp {
        &self.occurred_at
    }
}
