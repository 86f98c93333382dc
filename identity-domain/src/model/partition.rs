use crate::error::IdentityError;
use crate::value_object::{ValueObject, value_object};

/// 分区种类
#[value_object]
#[derive(Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKind {
    #[default]
    Realm,
    Tier,
}

/// 分区（Realm/Tier）：身份的作用域边界，例如租户或命名空间
#[value_object]
#[derive(Hash)]
pub struct Partition {
    id: String,
    name: String,
    kind: PartitionKind,
}

impl Partition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: PartitionKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// 以名称作为标识创建 Realm
    pub fn realm(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, PartitionKind::Realm)
    }

    /// 以名称作为标识创建 Tier
    pub fn tier(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, PartitionKind::Tier)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PartitionKind {
        self.kind
    }
}

impl ValueObject for Partition {
    type Error = IdentityError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.id.trim().is_empty() {
            return Err(IdentityError::invalid_value("partition id must not be blank"));
        }
        if self.name.trim().is_empty() {
            return Err(IdentityError::invalid_value(
                "partition name must not be blank",
            ));
        }
        Ok(())
    }
}
