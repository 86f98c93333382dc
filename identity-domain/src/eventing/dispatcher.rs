//! 事件分发器（EventDispatcher）协议
//!
//! 支持单条与批量发布，订阅返回 'static 生命周期事件流，
//! 以便在异步运行时（如 tokio::spawn）中消费。
//!
use crate::domain_event::EventEnvelope;
use crate::error::IdentityResult;
use async_trait::async_trait;
use futures_core::stream::BoxStream;

#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn publish(&self, envelope: &EventEnvelope) -> IdentityResult<()>;

    async fn publish_batch(&self, envelopes: &[EventEnvelope]) -> IdentityResult<()> {
        for envelope in envelopes {
            self.publish(envelope).await?;
        }
        Ok(())
    }

    async fn subscribe(&self) -> BoxStream<'static, IdentityResult<EventEnvelope>>;
}
