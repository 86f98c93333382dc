//! 事件分发协议（eventing）
//!
//! 记录映射器的生命周期钩子只描述事件（`EventEnvelope`），从不自行分发；
//! 分发由外部协作者通过 `EventDispatcher` 完成。`InMemoryEventDispatcher`
//! 提供基于广播通道的内存实现，便于测试与本地开发。
//!
pub mod dispatcher;
pub mod dispatcher_inmemory;

pub use dispatcher::EventDispatcher;
pub use dispatcher_inmemory::InMemoryEventDispatcher;
