//! 持久化映射（persist）
//!
//! 身份领域对象与存储侧通用记录之间的翻译层：
//! - 存储模式配置与模型属性绑定（`IdentityStoreConfig`/`PropertyBindings`）；
//! - 通用记录协议（`Record`/`GenericRecord`）；
//! - 鉴别值与分区的外部查找（`DiscriminatorResolver`/`PartitionResolver`）；
//! - 变体扩展点与内置变体处理器（`IdentityTypeHandler`）；
//! - 公共字段的双向映射（`RecordMapper`）。
//!
//! 本模块只做翻译，不执行任何存储 IO。
//!
mod config;
mod handler;
mod handlers;
mod mapper;
mod record;
mod resolver;

pub use config::{
    DEFAULT_ATTRIBUTE_ENTITY, DEFAULT_IDENTITY_ENTITY, IdentityStoreConfig, ModelProperty,
    PropertyBindings,
};
pub use handler::IdentityTypeHandler;
pub use handlers::{
    GROUP_NAME, GROUP_PARENT, GroupHandler, ROLE_DESCRIPTION, RoleHandler, USER_EMAIL,
    USER_FIRST_NAME, USER_LAST_NAME, UserHandler,
};
pub use mapper::RecordMapper;
pub use record::{GenericRecord, Record, RecordFactory};
pub use resolver::{
    DiscriminatorRegistry, DiscriminatorResolver, PartitionIdResolver, PartitionResolver,
};
