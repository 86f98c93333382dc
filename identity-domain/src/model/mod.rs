//! 身份领域模型（model）
//!
//! - `IdentityType`：所有身份变体共享的公共能力（自然键、启用标记、创建/过期时间、多值属性）；
//! - 内置变体 `User`、`Group`、`Role`，均由 `#[identity_type]` 宏注入公共字段；
//! - `Attributes`：名称到多个值的有序映射；
//! - `Partition`：身份的作用域（Realm/Tier），缺省表示未分区。
//!
mod attributes;
mod group;
mod identity;
mod partition;
mod role;
mod user;

pub use attributes::Attributes;
pub use group::Group;
pub use identity::{IdentityType, Timestamp, now};
pub use partition::{Partition, PartitionKind};
pub use role::Role;
pub use user::User;

pub use identity_macros::identity_type;
