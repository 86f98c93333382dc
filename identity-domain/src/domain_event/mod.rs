//! 身份生命周期事件（Domain Event）
//!
//! 记录映射器只“描述”事件而不分发：生命周期钩子返回 `EventEnvelope`，
//! 由外部事件分发方（见 `eventing`）负责投递。
//!
//! - `DomainEvent`：事件载荷的最小接口；
//! - `IdentityEvent`：创建/更新/删除三类身份事件；
//! - `EventEnvelope`：载荷 + 元数据（身份键、鉴别值、分区、发生时间）+ 业务上下文。

mod domain_event_trait;
mod event_context;
mod event_envelope;
mod identity_event;
mod metadata;

pub use domain_event_trait::DomainEvent;
pub use event_context::EventContext;
pub use event_envelope::EventEnvelope;
pub use identity_event::IdentityEvent;
pub use metadata::Metadata;
