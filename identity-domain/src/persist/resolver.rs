//! 外部查找协议：鉴别值解析与分区引用解析
//!
use crate::error::{IdentityError, IdentityResult};
use crate::model::{Group, IdentityType, Partition, Role, User};
use crate::value::Value;
use std::any::{TypeId, type_name};
use std::collections::HashMap;

/// 鉴别值解析：身份变体类型 <-> 稳定的字符串标记
pub trait DiscriminatorResolver: Send + Sync {
    fn discriminator_for(&self, type_id: TypeId) -> Option<&str>;

    fn type_for(&self, discriminator: &str) -> Option<TypeId>;
}

/// 分区解析：领域分区对象 -> 存储侧引用形式
pub trait PartitionResolver: Send + Sync {
    fn lookup_partition(&self, partition: &Partition) -> IdentityResult<Value>;
}

/// 基于 `TypeId` 的鉴别值注册表
#[derive(Debug, Clone, Default)]
pub struct DiscriminatorRegistry {
    by_type: HashMap<TypeId, String>,
    by_token: HashMap<String, TypeId>,
}

impl DiscriminatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置变体：`user`、`group`、`role`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(TypeId::of::<User>(), "user");
        registry.insert(TypeId::of::<Group>(), "group");
        registry.insert(TypeId::of::<Role>(), "role");
        registry
    }

    /// 注册变体；同一类型或同一标记重复注册视为配置错误
    pub fn register<T: IdentityType>(&mut self, token: impl Into<String>) -> IdentityResult<()> {
        let token = token.into();
        let type_id = TypeId::of::<T>();
        if token.trim().is_empty() {
            return Err(IdentityError::configuration(format!(
                "blank discriminator for {}",
                type_name::<T>()
            )));
        }
        if let Some(existing) = self.by_type.get(&type_id) {
            return Err(IdentityError::configuration(format!(
                "{} already registered as {existing:?}",
                type_name::<T>()
            )));
        }
        if self.by_token.contains_key(&token) {
            return Err(IdentityError::configuration(format!(
                "discriminator {token:?} already registered"
            )));
        }
        self.insert(type_id, token);
        Ok(())
    }

    /// 链式注册
    pub fn with<T: IdentityType>(mut self, token: impl Into<String>) -> IdentityResult<Self> {
        self.register::<T>(token)?;
        Ok(self)
    }

    fn insert(&mut self, type_id: TypeId, token: impl Into<String>) {
        let token = token.into();
        self.by_token.insert(token.clone(), type_id);
        self.by_type.insert(type_id, token);
    }
}

impl DiscriminatorResolver for DiscriminatorRegistry {
    fn discriminator_for(&self, type_id: TypeId) -> Option<&str> {
        self.by_type.get(&type_id).map(String::as_str)
    }

    fn type_for(&self, discriminator: &str) -> Option<TypeId> {
        self.by_token.get(discriminator).copied()
    }
}

/// 以分区标识（文本）作为存储引用
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionIdResolver;

impl PartitionResolver for PartitionIdResolver {
    fn lookup_partition(&self, partition: &Partition) -> IdentityResult<Value> {
        Ok(Value::from(partition.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_maps_both_ways() {
        let registry = DiscriminatorRegistry::standard();
        assert_eq!(registry.discriminator_for(TypeId::of::<User>()), Some("user"));
        assert_eq!(registry.type_for("role"), Some(TypeId::of::<Role>()));
        assert_eq!(registry.type_for("agent"), None);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = DiscriminatorRegistry::new().with::<User>("user").unwrap();
        assert!(registry.clone().with::<User>("person").is_err());
        let err = registry.with::<Group>("user").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn partition_resolves_to_its_id() {
        let value = PartitionIdResolver
            .lookup_partition(&Partition::realm("acme"))
            .unwrap();
        assert_eq!(value, Value::from("acme"));
    }
}
