//! 内存版事件分发器（InMemoryEventDispatcher）
//!
//! 基于 `tokio::sync::broadcast`：`publish` 克隆并广播信封，`subscribe` 返回
//! 从订阅时刻开始的事件流。无订阅者时发布的事件被丢弃；订阅者落后超过缓冲区容量时
//! 流中产生 `EventDispatch` 错误。
//!
use crate::domain_event::EventEnvelope;
use crate::error::{IdentityError, IdentityResult};
use crate::eventing::EventDispatcher;
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::trace;

#[derive(Clone)]
pub struct InMemoryEventDispatcher {
    tx: broadcast::Sender<EventEnvelope>,
}

impl InMemoryEventDispatcher {
    /// `capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl EventDispatcher for InMemoryEventDispatcher {
    async fn publish(&self, envelope: &EventEnvelope) -> IdentityResult<()> {
        // 无订阅者时 send 返回错误，这里视为非致命
        if self.tx.send(envelope.clone()).is_err() {
            trace!(
                key = envelope.metadata.identity_key(),
                "no subscribers, event dropped"
            );
        }
        Ok(())
    }

    async fn subscribe(&self) -> BoxStream<'static, IdentityResult<EventEnvelope>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx)
            .map(|r| r.map_err(|e| IdentityError::event_dispatch(e.to_string())));
        Box::pin(stream)
    }
}
