//! 存储配置（IdentityStoreConfig）
//!
//! 描述当前存储模式：身份记录与属性记录的实体名，以及抽象模型属性到
//! 具体存储属性名的绑定。配置可在代码中通过 builder 构造，也可从 JSON 反序列化。
//!
use crate::error::{IdentityError, IdentityResult};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_IDENTITY_ENTITY: &str = "identity_object";
pub const DEFAULT_ATTRIBUTE_ENTITY: &str = "identity_object_attribute";

/// 抽象模型属性：记录映射与谓词编译只通过它来定位存储属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProperty {
    /// 身份记录的代理标识（可选；缺省时以自然键作为引用）
    IdentityId,
    IdentityDiscriminator,
    IdentityKey,
    IdentityEnabled,
    IdentityCreated,
    IdentityExpires,
    IdentityPartition,
    /// 属性记录上指向所属身份的引用
    AttributeIdentity,
    AttributeName,
    AttributeValue,
}

impl ModelProperty {
    pub const ALL: [ModelProperty; 10] = [
        ModelProperty::IdentityId,
        ModelProperty::IdentityDiscriminator,
        ModelProperty::IdentityKey,
        ModelProperty::IdentityEnabled,
        ModelProperty::IdentityCreated,
        ModelProperty::IdentityExpires,
        ModelProperty::IdentityPartition,
        ModelProperty::AttributeIdentity,
        ModelProperty::AttributeName,
        ModelProperty::AttributeValue,
    ];

    /// 写入身份记录时必须存在绑定的属性
    pub const REQUIRED_FOR_IDENTITY: [ModelProperty; 4] = [
        ModelProperty::IdentityDiscriminator,
        ModelProperty::IdentityKey,
        ModelProperty::IdentityEnabled,
        ModelProperty::IdentityCreated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProperty::IdentityId => "identity_id",
            ModelProperty::IdentityDiscriminator => "identity_discriminator",
            ModelProperty::IdentityKey => "identity_key",
            ModelProperty::IdentityEnabled => "identity_enabled",
            ModelProperty::IdentityCreated => "identity_created",
            ModelProperty::IdentityExpires => "identity_expires",
            ModelProperty::IdentityPartition => "identity_partition",
            ModelProperty::AttributeIdentity => "attribute_identity",
            ModelProperty::AttributeName => "attribute_name",
            ModelProperty::AttributeValue => "attribute_value",
        }
    }

    /// 约定的存储属性名
    fn conventional_name(&self) -> &'static str {
        match self {
            ModelProperty::IdentityId => "id",
            ModelProperty::IdentityDiscriminator => "discriminator",
            ModelProperty::IdentityKey => "key",
            ModelProperty::IdentityEnabled => "enabled",
            ModelProperty::IdentityCreated => "created",
            ModelProperty::IdentityExpires => "expires",
            ModelProperty::IdentityPartition => "partition",
            ModelProperty::AttributeIdentity => "identity",
            ModelProperty::AttributeName => "name",
            ModelProperty::AttributeValue => "value",
        }
    }
}

impl fmt::Display for ModelProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 模型属性到存储属性名的绑定表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBindings(BTreeMap<ModelProperty, String>);

impl PropertyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部模型属性按约定名绑定（`discriminator`、`key`、`enabled` ……）
    pub fn conventional() -> Self {
        Self(
            ModelProperty::ALL
                .iter()
                .map(|p| (*p, p.conventional_name().to_string()))
                .collect(),
        )
    }

    pub fn bind(mut self, property: ModelProperty, name: impl Into<String>) -> Self {
        self.insert(property, name);
        self
    }

    pub fn unbind(mut self, property: ModelProperty) -> Self {
        self.0.remove(&property);
        self
    }

    pub fn insert(&mut self, property: ModelProperty, name: impl Into<String>) {
        self.0.insert(property, name.into());
    }

    pub fn get(&self, property: ModelProperty) -> Option<&str> {
        self.0.get(&property).map(String::as_str)
    }

    /// 获取必需的绑定，缺失即为配置错误
    pub fn require(&self, property: ModelProperty) -> IdentityResult<&str> {
        self.get(property)
            .ok_or(IdentityError::MissingBinding { property })
    }

    /// 身份记录的引用属性：优先使用代理标识，否则退回自然键
    pub fn identity_reference(&self) -> IdentityResult<(ModelProperty, &str)> {
        match self.get(ModelProperty::IdentityId) {
            Some(name) => Ok((ModelProperty::IdentityId, name)),
            None => Ok((
                ModelProperty::IdentityKey,
                self.require(ModelProperty::IdentityKey)?,
            )),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelProperty, &str)> {
        self.0.iter().map(|(p, n)| (*p, n.as_str()))
    }
}

/// 存储模式配置
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct IdentityStoreConfig {
    /// 身份记录实体名
    #[builder(into, default = DEFAULT_IDENTITY_ENTITY.to_string())]
    #[serde(default = "default_identity_entity")]
    identity_entity: String,
    /// 属性记录实体名
    #[builder(into, default = DEFAULT_ATTRIBUTE_ENTITY.to_string())]
    #[serde(default = "default_attribute_entity")]
    attribute_entity: String,
    #[builder(default)]
    #[serde(default)]
    bindings: PropertyBindings,
    /// 属性查询前是否对值去重（默认关闭：计数目标等于传入值的个数）
    #[builder(default)]
    #[serde(default)]
    dedupe_attribute_values: bool,
}

fn default_identity_entity() -> String {
    DEFAULT_IDENTITY_ENTITY.to_string()
}

fn default_attribute_entity() -> String {
    DEFAULT_ATTRIBUTE_ENTITY.to_string()
}

impl IdentityStoreConfig {
    /// 默认实体名 + 约定绑定
    pub fn conventional() -> Self {
        Self::builder()
            .bindings(PropertyBindings::conventional())
            .build()
    }

    /// 从 JSON 加载配置并校验
    pub fn from_json(json: &str) -> IdentityResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn identity_entity(&self) -> &str {
        &self.identity_entity
    }

    pub fn attribute_entity(&self) -> &str {
        &self.attribute_entity
    }

    pub fn bindings(&self) -> &PropertyBindings {
        &self.bindings
    }

    pub fn dedupe_attribute_values(&self) -> bool {
        self.dedupe_attribute_values
    }

    /// 校验实体名非空、身份记录的必需绑定齐全
    pub fn validate(&self) -> IdentityResult<()> {
        if self.identity_entity.trim().is_empty() {
            return Err(IdentityError::configuration("identity entity name is blank"));
        }
        if self.attribute_entity.trim().is_empty() {
            return Err(IdentityError::configuration(
                "attribute entity name is blank",
            ));
        }
        for property in ModelProperty::REQUIRED_FOR_IDENTITY {
            self.bindings.require(property)?;
        }
        if let Some((property, _)) = self.bindings.iter().find(|(_, n)| n.trim().is_empty()) {
            return Err(IdentityError::configuration(format!(
                "blank binding for {property}"
            )));
        }
        Ok(())
    }
}

impl Default for IdentityStoreConfig {
    fn default() -> Self {
        Self::conventional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_config_is_valid() {
        let config = IdentityStoreConfig::conventional();
        assert!(config.validate().is_ok());
        assert_eq!(config.identity_entity(), DEFAULT_IDENTITY_ENTITY);
        assert_eq!(
            config.bindings().get(ModelProperty::IdentityEnabled),
            Some("enabled")
        );
        assert!(!config.dedupe_attribute_values());
    }

    #[test]
    fn missing_required_binding_is_configuration_error() {
        let config = IdentityStoreConfig::builder()
            .bindings(PropertyBindings::conventional().unbind(ModelProperty::IdentityCreated))
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        match err {
            IdentityError::MissingBinding { property } => {
                assert_eq!(property, ModelProperty::IdentityCreated)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn identity_reference_falls_back_to_key() {
        let bindings = PropertyBindings::conventional().unbind(ModelProperty::IdentityId);
        assert_eq!(
            bindings.identity_reference().unwrap(),
            (ModelProperty::IdentityKey, "key")
        );
        let bindings = PropertyBindings::conventional();
        assert_eq!(
            bindings.identity_reference().unwrap(),
            (ModelProperty::IdentityId, "id")
        );
    }

    #[test]
    fn loads_from_json_with_defaults() {
        let json = r#"{
            "identity_entity": "principal",
            "bindings": {
                "identity_discriminator": "type_name",
                "identity_key": "login",
                "identity_enabled": "active",
                "identity_created": "created_at"
            },
            "dedupe_attribute_values": true
        }"#;
        let config = IdentityStoreConfig::from_json(json).unwrap();
        assert_eq!(config.identity_entity(), "principal");
        assert_eq!(config.attribute_entity(), DEFAULT_ATTRIBUTE_ENTITY);
        assert_eq!(
            config.bindings().get(ModelProperty::IdentityKey),
            Some("login")
        );
        assert_eq!(config.bindings().get(ModelProperty::IdentityExpires), None);
        assert!(config.dedupe_attribute_values());
    }

    #[test]
    fn json_missing_required_binding_is_rejected() {
        let json = r#"{ "bindings": { "identity_key": "login" } }"#;
        assert!(matches!(
            IdentityStoreConfig::from_json(json),
            Err(IdentityError::MissingBinding { .. })
        ));
    }
}
