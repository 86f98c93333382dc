//! 内置身份变体的处理器
//!
//! 变体字段按固定存储属性名写入身份记录：
//! - 用户：`first_name`、`last_name`、`email`
//! - 组：`name`、`parent`
//! - 角色：`description`
//!
use crate::error::{IdentityError, IdentityResult};
use crate::model::{Group, IdentityType, Partition, Role, User};
use crate::persist::{IdentityTypeHandler, Record};
use crate::value::Value;

pub const USER_FIRST_NAME: &str = "first_name";
pub const USER_LAST_NAME: &str = "last_name";
pub const USER_EMAIL: &str = "email";
pub const GROUP_NAME: &str = "name";
pub const GROUP_PARENT: &str = "parent";
pub const ROLE_DESCRIPTION: &str = "description";

fn optional_text<R: Record>(record: &R, name: &str) -> IdentityResult<Option<String>> {
    match record.property(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(s)) => Ok(Some(s.clone())),
        Some(other) => Err(IdentityError::invalid_value(format!(
            "{name}: expected text, found {}",
            other.kind()
        ))),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserHandler;

impl<R: Record> IdentityTypeHandler<R> for UserHandler {
    type Identity = User;

    fn create_identity(
        &self,
        _partition: Option<&Partition>,
        _discriminator: &str,
        key: String,
    ) -> IdentityResult<User> {
        Ok(User::new(key))
    }

    fn populate_extra(&self, record: &mut R, user: &User) -> IdentityResult<()> {
        record.set_property(USER_FIRST_NAME, Value::from(user.first_name.clone()))?;
        record.set_property(USER_LAST_NAME, Value::from(user.last_name.clone()))?;
        record.set_property(USER_EMAIL, Value::from(user.email.clone()))
    }

    fn read_extra(&self, record: &R, user: &mut User) -> IdentityResult<()> {
        user.first_name = optional_text(record, USER_FIRST_NAME)?;
        user.last_name = optional_text(record, USER_LAST_NAME)?;
        user.email = optional_text(record, USER_EMAIL)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupHandler;

impl<R: Record> IdentityTypeHandler<R> for GroupHandler {
    type Identity = Group;

    fn create_identity(
        &self,
        _partition: Option<&Partition>,
        _discriminator: &str,
        key: String,
    ) -> IdentityResult<Group> {
        Ok(Group::new(key))
    }

    fn populate_extra(&self, record: &mut R, group: &Group) -> IdentityResult<()> {
        record.set_property(GROUP_NAME, Value::from(group.name.as_str()))?;
        record.set_property(GROUP_PARENT, Value::from(group.parent_key.clone()))
    }

    fn read_extra(&self, record: &R, group: &mut Group) -> IdentityResult<()> {
        // 组名缺失时退回路径的最后一段
        group.name = match optional_text(record, GROUP_NAME)? {
            Some(name) => name,
            None => group
                .path()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        group.parent_key = optional_text(record, GROUP_PARENT)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoleHandler;

impl<R: Record> IdentityTypeHandler<R> for RoleHandler {
    type Identity = Role;

    fn create_identity(
        &self,
        _partition: Option<&Partition>,
        _discriminator: &str,
        key: String,
    ) -> IdentityResult<Role> {
        Ok(Role::new(key))
    }

    fn populate_extra(&self, record: &mut R, role: &Role) -> IdentityResult<()> {
        record.set_property(ROLE_DESCRIPTION, Value::from(role.description.clone()))
    }

    fn read_extra(&self, record: &R, role: &mut Role) -> IdentityResult<()> {
        role.description = optional_text(record, ROLE_DESCRIPTION)?;
        Ok(())
    }
}
