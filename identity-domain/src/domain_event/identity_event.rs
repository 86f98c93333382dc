use super::domain_event_trait::DomainEvent;
use crate::error::IdentityResult;
use crate::model::IdentityType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 身份生命周期事件
///
/// `snapshot` 默认是身份对象的 JSON 快照，变体处理器可替换为自定义内容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityEvent {
    Created {
        id: String,
        key: String,
        snapshot: Value,
    },
    Updated {
        id: String,
        key: String,
        snapshot: Value,
    },
    Deleted {
        id: String,
        key: String,
    },
}

impl IdentityEvent {
    pub fn created<T: IdentityType>(identity: &T) -> IdentityResult<Self> {
        Ok(Self::Created {
            id: new_event_id(),
            key: identity.key().to_string(),
            snapshot: serde_json::to_value(identity)?,
        })
    }

    pub fn updated<T: IdentityType>(identity: &T) -> IdentityResult<Self> {
        Ok(Self::Updated {
            id: new_event_id(),
            key: identity.key().to_string(),
            snapshot: serde_json::to_value(identity)?,
        })
    }

    pub fn deleted<T: IdentityType>(identity: &T) -> Self {
        Self::Deleted {
            id: new_event_id(),
            key: identity.key().to_string(),
        }
    }

    /// 事件针对的身份自然键
    pub fn key(&self) -> &str {
        match self {
            Self::Created { key, .. } | Self::Updated { key, .. } | Self::Deleted { key, .. } => {
                key
            }
        }
    }
}

fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

impl DomainEvent for IdentityEvent {
    fn event_id(&self) -> &str {
        match self {
            Self::Created { id, .. } | Self::Updated { id, .. } | Self::Deleted { id, .. } => id,
        }
    }

    fn event_type(&self) -> &str {
        match self {
            Self::Created { .. } => "IdentityEvent.Created",
            Self::Updated { .. } => "IdentityEvent.Updated",
            Self::Deleted { .. } => "IdentityEvent.Deleted",
        }
    }

    fn event_version(&self) -> usize {
        1
    }
}
