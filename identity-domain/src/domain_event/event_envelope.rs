use super::event_context::EventContext;
use super::identity_event::IdentityEvent;
use super::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// 事件信封，包含事件载荷、元数据与业务上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub metadata: Metadata,
    pub payload: IdentityEvent,
    pub context: EventContext,
}

impl EventEnvelope {
    pub fn new(metadata: Metadata, payload: IdentityEvent) -> Self {
        Self {
            metadata,
            payload,
            context: EventContext::default(),
        }
    }

    /// 替换业务上下文
    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = context;
        self
    }
}
