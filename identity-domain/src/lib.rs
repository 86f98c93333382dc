//! 身份领域核心库（identity-domain）
//!
//! 将多态的身份领域模型（用户、组、角色以及后续扩展的变体）映射到统一的关系型记录形态，
//! 并把与后端无关的抽象查询参数编译为具体的存储谓词：
//! - 领域模型（`model`）：`IdentityType` 抽象、多值属性与分区（Realm/Tier）
//! - 记录映射（`persist`）：公共字段由 `RecordMapper` 统一处理，变体字段交由 `IdentityTypeHandler`
//! - 谓词编译（`query`）：`PredicateCompiler` 基于 `CriteriaBuilder` 原语生成谓词，
//!   其中属性查询采用“分组计数”的子查询实现多值 AND 语义
//! - 生命周期事件（`domain_event`）与外部分发协议（`eventing`）
//!
//! 本 crate 不执行任何存储访问，也不持有可变共享状态；事务、连接、缓存与实际查询执行
//! 均由上层基础设施负责。
//!
//! 典型用法：
//! 1. 构造 `IdentityStoreConfig`（属性绑定）、`DiscriminatorRegistry` 与 `PartitionResolver`；
//! 2. 为每个身份变体提供 `IdentityTypeHandler`，组装 `RecordMapper` 完成记录读写；
//! 3. 用 `PredicateCompiler` 将 `IdentityQuery` 编译为谓词，交给存储执行方。
//!
pub mod domain_event;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod model;
pub mod persist;
pub mod query;
pub mod specification;
pub mod value;
pub mod value_object;

// 允许在本 crate 内部通过 ::identity_domain 进行自引用，
// 以便 #[identity_type] 宏生成的路径在本 crate 内同样可解析。
extern crate self as identity_domain;
