//! 记录映射器（RecordMapper）
//!
//! 在一个身份变体与通用记录形态之间做双向翻译，只处理所有变体共有的字段：
//! 鉴别值、自然键、启用标记、创建/过期时间与所属分区。变体字段交由注入的
//! `IdentityTypeHandler` 处理。映射器不缓存任何记录或对象，每次调用都是一次独立翻译。
//!
use crate::domain_event::{EventEnvelope, IdentityEvent, Metadata};
use crate::error::{IdentityError, IdentityResult};
use crate::model::{Attributes, IdentityType, Partition, Timestamp};
use crate::persist::{
    DiscriminatorResolver, IdentityStoreConfig, IdentityTypeHandler, ModelProperty,
    PartitionResolver, Record, RecordFactory,
};
use crate::value::Value;
use chrono::Utc;
use std::any::{TypeId, type_name};
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

pub struct RecordMapper<R, H> {
    config: Arc<IdentityStoreConfig>,
    discriminators: Arc<dyn DiscriminatorResolver>,
    partitions: Arc<dyn PartitionResolver>,
    factory: RecordFactory<R>,
    handler: H,
}

fn default_record<R: Default>() -> IdentityResult<R> {
    Ok(R::default())
}

impl<R, H> RecordMapper<R, H>
where
    R: Record + Default + 'static,
    H: IdentityTypeHandler<R>,
{
    /// 以 `R::default()` 作为记录工厂
    pub fn new(
        config: Arc<IdentityStoreConfig>,
        discriminators: Arc<dyn DiscriminatorResolver>,
        partitions: Arc<dyn PartitionResolver>,
        handler: H,
    ) -> Self {
        Self {
            config,
            discriminators,
            partitions,
            factory: Arc::new(default_record::<R>),
            handler,
        }
    }
}

impl<R, H> RecordMapper<R, H>
where
    R: Record,
    H: IdentityTypeHandler<R>,
{
    /// 替换记录工厂（例如需要预置存储侧默认列的记录类型）
    pub fn with_record_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> IdentityResult<R> + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    pub fn config(&self) -> &IdentityStoreConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// 分配新记录并填充
    ///
    /// 若绑定了代理标识（`IdentityId`），新记录会获得一个 UUID v4。
    pub fn create_record(
        &self,
        partition: Option<&Partition>,
        identity: &H::Identity,
    ) -> IdentityResult<R> {
        let mut record = (self.factory)().map_err(|err| match err {
            err @ IdentityError::RecordInstantiation { .. } => err,
            other => IdentityError::RecordInstantiation {
                reason: other.to_string(),
            },
        })?;

        if let Some(name) = self.config.bindings().get(ModelProperty::IdentityId) {
            if record.property(name).is_none_or(Value::is_null) {
                record.set_property(name, Value::from(Uuid::new_v4().to_string()))?;
            }
        }

        self.populate_record(partition, &mut record, identity)?;
        Ok(record)
    }

    /// 将领域对象写入记录
    ///
    /// 鉴别值、自然键、启用标记与创建时间为必填；过期时间可缺省。
    /// 未传入分区时分区槽位保持原样。
    pub fn populate_record(
        &self,
        partition: Option<&Partition>,
        record: &mut R,
        identity: &H::Identity,
    ) -> IdentityResult<()> {
        let discriminator = self.discriminator()?;
        self.write_required(
            record,
            ModelProperty::IdentityDiscriminator,
            Value::from(discriminator),
        )?;

        let key = identity.key();
        let key = if key.trim().is_empty() {
            Value::Null
        } else {
            Value::from(key)
        };
        self.write_required(record, ModelProperty::IdentityKey, key)?;
        self.write_required(
            record,
            ModelProperty::IdentityEnabled,
            Value::from(identity.is_enabled()),
        )?;
        self.write_required(
            record,
            ModelProperty::IdentityCreated,
            Value::from(identity.created_date()),
        )?;
        self.write_optional(
            record,
            ModelProperty::IdentityExpires,
            Value::from(identity.expiration_date()),
        )?;

        if let Some(partition) = partition {
            let reference = self.partitions.lookup_partition(partition)?;
            self.write_optional(record, ModelProperty::IdentityPartition, reference)?;
        }

        trace!(
            discriminator,
            key = identity.key(),
            "populated common identity properties"
        );

        self.handler.populate_extra(record, identity)
    }

    /// 从记录重建领域对象
    ///
    /// 先由变体处理器按鉴别值与自然键创建对象并读取变体字段，
    /// 再覆盖启用标记与创建/过期时间。
    pub fn read_record(
        &self,
        partition: Option<&Partition>,
        record: &R,
    ) -> IdentityResult<H::Identity> {
        let discriminator =
            String::try_from(self.read_required(record, ModelProperty::IdentityDiscriminator)?)?;
        self.check_discriminator(&discriminator)?;

        let key = String::try_from(self.read_required(record, ModelProperty::IdentityKey)?)?;
        let mut identity = self
            .handler
            .create_identity(partition, &discriminator, key)?;
        self.handler.read_extra(record, &mut identity)?;

        identity.set_enabled(bool::try_from(
            self.read_required(record, ModelProperty::IdentityEnabled)?,
        )?);
        identity.set_created_date(Timestamp::try_from(
            self.read_required(record, ModelProperty::IdentityCreated)?,
        )?);
        let expires = self
            .read_optional(record, ModelProperty::IdentityExpires)?
            .map(Timestamp::try_from)
            .transpose()?;
        identity.set_expiration_date(expires);

        Ok(identity)
    }

    /// 删除记录前调用，交由变体处理器清理依赖数据
    pub fn before_remove(&self, record: &R, identity: &H::Identity) -> IdentityResult<()> {
        debug!(key = identity.key(), "preparing identity record removal");
        self.handler.before_remove(record, identity)
    }

    pub fn on_created(
        &self,
        partition: Option<&Partition>,
        identity: &H::Identity,
    ) -> IdentityResult<EventEnvelope> {
        let event = self.handler.created_event(identity)?;
        self.envelope(partition, identity, event)
    }

    pub fn on_updated(
        &self,
        partition: Option<&Partition>,
        identity: &H::Identity,
    ) -> IdentityResult<EventEnvelope> {
        let event = self.handler.updated_event(identity)?;
        self.envelope(partition, identity, event)
    }

    pub fn on_deleted(
        &self,
        partition: Option<&Partition>,
        identity: &H::Identity,
    ) -> IdentityResult<EventEnvelope> {
        let event = self.handler.deleted_event(identity)?;
        self.envelope(partition, identity, event)
    }

    /// 记录的存储引用（属性记录通过它指向所属身份）
    pub fn reference_of(&self, record: &R) -> IdentityResult<Value> {
        let (property, _) = self.config.bindings().identity_reference()?;
        self.read_required(record, property)
    }

    /// 将领域对象的多值属性展开为属性记录，每个值一条
    pub fn create_attribute_records<A>(
        &self,
        owner: &Value,
        identity: &H::Identity,
    ) -> IdentityResult<Vec<A>>
    where
        A: Record + Default,
    {
        let bindings = self.config.bindings();
        let owner_binding = bindings.require(ModelProperty::AttributeIdentity)?;
        let name_binding = bindings.require(ModelProperty::AttributeName)?;
        let value_binding = bindings.require(ModelProperty::AttributeValue)?;

        if owner.is_null() {
            return Err(IdentityError::RequiredPropertyNull {
                property: ModelProperty::AttributeIdentity,
                binding: owner_binding.to_string(),
            });
        }

        let mut records = Vec::new();
        for (name, values) in identity.attributes().iter() {
            for value in values {
                let mut record = A::default();
                record.set_property(owner_binding, owner.clone())?;
                record.set_property(name_binding, Value::from(name))?;
                record.set_property(value_binding, value.clone())?;
                records.push(record);
            }
        }
        Ok(records)
    }

    /// 用属于 `owner` 的属性记录替换领域对象的属性集合
    pub fn read_attribute_records<A>(
        &self,
        owner: &Value,
        records: &[A],
        identity: &mut H::Identity,
    ) -> IdentityResult<()>
    where
        A: Record,
    {
        let bindings = self.config.bindings();
        let owner_binding = bindings.require(ModelProperty::AttributeIdentity)?;
        let name_binding = bindings.require(ModelProperty::AttributeName)?;
        let value_binding = bindings.require(ModelProperty::AttributeValue)?;

        let mut attributes = Attributes::new();
        for record in records {
            if !record
                .property(owner_binding)
                .is_some_and(|v| v.sql_eq(owner))
            {
                continue;
            }
            let name = record
                .property(name_binding)
                .and_then(Value::as_text)
                .ok_or_else(|| IdentityError::MissingRecordProperty {
                    property: ModelProperty::AttributeName,
                    binding: name_binding.to_string(),
                })?;
            let value = record.property(value_binding).cloned().unwrap_or_default();
            attributes.add(name, value);
        }

        *identity.attributes_mut() = attributes;
        Ok(())
    }

    fn discriminator(&self) -> IdentityResult<&str> {
        self.discriminators
            .discriminator_for(TypeId::of::<H::Identity>())
            .ok_or(IdentityError::UnregisteredIdentityType {
                type_name: type_name::<H::Identity>(),
            })
    }

    fn check_discriminator(&self, discriminator: &str) -> IdentityResult<()> {
        let expected = self.discriminator()?;
        match self.discriminators.type_for(discriminator) {
            None => Err(IdentityError::UnknownDiscriminator {
                discriminator: discriminator.to_string(),
            }),
            Some(type_id) if type_id == TypeId::of::<H::Identity>() => Ok(()),
            Some(_) => Err(IdentityError::TypeMismatch {
                expected: expected.to_string(),
                found: discriminator.to_string(),
            }),
        }
    }

    fn envelope(
        &self,
        partition: Option<&Partition>,
        identity: &H::Identity,
        event: IdentityEvent,
    ) -> IdentityResult<EventEnvelope> {
        let metadata = Metadata::builder()
            .identity_key(identity.key())
            .identity_type(self.discriminator()?)
            .maybe_partition_id(partition.map(|p| p.id().to_string()))
            .occurred_at(Utc::now())
            .build();
        Ok(EventEnvelope::new(metadata, event))
    }

    fn write_required(
        &self,
        record: &mut R,
        property: ModelProperty,
        value: Value,
    ) -> IdentityResult<()> {
        let binding = self.config.bindings().require(property)?;
        if value.is_null() {
            return Err(IdentityError::RequiredPropertyNull {
                property,
                binding: binding.to_string(),
            });
        }
        record.set_property(binding, value)
    }

    fn write_optional(
        &self,
        record: &mut R,
        property: ModelProperty,
        value: Value,
    ) -> IdentityResult<()> {
        match self.config.bindings().get(property) {
            Some(binding) => record.set_property(binding, value),
            None => {
                debug!(%property, "optional property is not bound, skipping");
                Ok(())
            }
        }
    }

    fn read_required(&self, record: &R, property: ModelProperty) -> IdentityResult<Value> {
        let binding = self.config.bindings().require(property)?;
        match record.property(binding) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => Err(IdentityError::MissingRecordProperty {
                property,
                binding: binding.to_string(),
            }),
        }
    }

    fn read_optional(&self, record: &R, property: ModelProperty) -> IdentityResult<Option<Value>> {
        let Some(binding) = self.config.bindings().get(property) else {
            return Ok(None);
        };
        Ok(record.property(binding).filter(|v| !v.is_null()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::persist::{
        DiscriminatorRegistry, GenericRecord, PartitionIdResolver, PropertyBindings, RoleHandler,
    };

    fn mapper(bindings: PropertyBindings) -> RecordMapper<GenericRecord, RoleHandler> {
        let config = IdentityStoreConfig::builder().bindings(bindings).build();
        RecordMapper::new(
            Arc::new(config),
            Arc::new(DiscriminatorRegistry::standard()),
            Arc::new(PartitionIdResolver),
            RoleHandler,
        )
    }

    #[test]
    fn create_record_assigns_surrogate_id_when_bound() {
        let mapper = mapper(PropertyBindings::conventional());
        let record = mapper
            .create_record(None, &Role::new("admin".to_string()))
            .unwrap();
        let id = record.property("id").and_then(Value::as_text).unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(mapper.reference_of(&record).unwrap(), Value::from(id));
    }

    #[test]
    fn reference_falls_back_to_key_without_surrogate_id() {
        let mapper = mapper(PropertyBindings::conventional().unbind(ModelProperty::IdentityId));
        let record = mapper
            .create_record(None, &Role::new("admin".to_string()))
            .unwrap();
        assert!(!record.contains("id"));
        assert_eq!(mapper.reference_of(&record).unwrap(), Value::from("admin"));
    }

    #[test]
    fn factory_failure_is_record_instantiation_error() {
        let mapper = mapper(PropertyBindings::conventional()).with_record_factory(|| {
            Err(IdentityError::configuration("no table for identity records"))
        });
        let err = mapper
            .create_record(None, &Role::new("admin".to_string()))
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, IdentityError::RecordInstantiation { .. }));
    }

    #[test]
    fn missing_required_binding_fails_populate() {
        let mapper = mapper(PropertyBindings::conventional().unbind(ModelProperty::IdentityEnabled));
        let err = mapper
            .create_record(None, &Role::new("admin".to_string()))
            .unwrap_err();
        match err {
            IdentityError::MissingBinding { property } => {
                assert_eq!(property, ModelProperty::IdentityEnabled)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_key_is_rejected() {
        let mapper = mapper(PropertyBindings::conventional());
        let err = mapper
            .create_record(None, &Role::new("  ".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            IdentityError::RequiredPropertyNull {
                property: ModelProperty::IdentityKey,
                ..
            }
        ));
    }

    #[test]
    fn unbound_expiration_is_skipped() {
        let mapper = mapper(PropertyBindings::conventional().unbind(ModelProperty::IdentityExpires));
        let mut role = Role::new("admin".to_string());
        role.set_expiration_date(Some(Utc::now()));
        let record = mapper.create_record(None, &role).unwrap();
        assert!(!record.contains("expires"));

        let restored = mapper.read_record(None, &record).unwrap();
        assert_eq!(restored.expiration_date(), None);
    }

    #[test]
    fn unregistered_variant_is_configuration_error() {
        let config = IdentityStoreConfig::conventional();
        let mapper: RecordMapper<GenericRecord, RoleHandler> = RecordMapper::new(
            Arc::new(config),
            Arc::new(DiscriminatorRegistry::new()),
            Arc::new(PartitionIdResolver),
            RoleHandler,
        );
        let err = mapper
            .create_record(None, &Role::new("admin".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            IdentityError::UnregisteredIdentityType { .. }
        ));
    }

    #[test]
    fn lifecycle_hooks_describe_events_without_dispatching() {
        let mapper = mapper(PropertyBindings::conventional());
        let role = Role::new("admin".to_string());
        let realm = Partition::realm("acme");

        let created = mapper.on_created(Some(&realm), &role).unwrap();
        assert_eq!(created.metadata.identity_key(), "admin");
        assert_eq!(created.metadata.identity_type(), "role");
        assert_eq!(created.metadata.partition_id(), Some("acme"));
        assert!(matches!(created.payload, IdentityEvent::Created { .. }));

        let updated = mapper.on_updated(None, &role).unwrap();
        assert!(matches!(updated.payload, IdentityEvent::Updated { .. }));
        assert_eq!(updated.metadata.partition_id(), None);

        let deleted = mapper.on_deleted(None, &role).unwrap();
        assert!(matches!(deleted.payload, IdentityEvent::Deleted { .. }));
    }
}
