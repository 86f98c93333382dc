use bon::Builder;
use serde::{Deserialize, Serialize};

/// 业务上下文：由调用方在分发前补充，映射器只填默认值
#[derive(Builder, Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 触发事件的主体（如管理员登录名或系统任务名）
    actor_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<serde_json::Value>,
}

impl EventContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn extensions(&self) -> Option<&serde_json::Value> {
        self.extensions.as_ref()
    }
}
