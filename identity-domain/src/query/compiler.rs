//! 谓词编译器（PredicateCompiler）
//!
//! 每个查询参数独立编译为至多一个谓词：
//!
//! | 参数 | 谓词 |
//! |---|---|
//! | `Enabled` | 启用字段相等 |
//! | `CreatedDate` / `ExpiryDate` | 创建/过期时间相等 |
//! | `CreatedAfter` / `ExpiryAfter` | 严格大于 |
//! | `CreatedBefore` / `ExpiryBefore` | 严格小于 |
//! | `Attribute(name)` | 分组计数子查询 |
//! | `Other(_)` | 不产生谓词 |
//!
//! 标量参数只使用第一个绑定值。
//!
//! 属性参数的语义是“多值 AND”：身份在该属性名下的值集合必须覆盖全部传入值。
//! 实现为关联子查询：在属性记录上筛选 `name = 属性名 AND value IN (传入值)`，
//! 按所属身份分组，只保留匹配行数恰为 N（传入值的个数）的组，外层谓词要求身份引用
//! 属于该结果集。
//!
//! 注意：N 取传入列表的原始长度。传入 `["a", "a"]` 时 N = 2，而每个身份至多有一行
//! 匹配 `a`，因此不会有任何身份命中；开启 `dedupe_attribute_values` 后先去重再计数。
//! 空值列表编译为恒假谓词。
//!
use crate::error::{IdentityError, IdentityResult};
use crate::persist::{IdentityStoreConfig, ModelProperty};
use crate::query::{CriteriaBuilder, HavingCount, IdentityQuery, QueryParameter, Subquery};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Equal,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone)]
pub struct PredicateCompiler {
    config: Arc<IdentityStoreConfig>,
}

impl PredicateCompiler {
    pub fn new(config: Arc<IdentityStoreConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IdentityStoreConfig {
        &self.config
    }

    /// 编译单个参数；没有对应规则的参数返回 `None`
    pub fn compile<B>(
        &self,
        builder: &B,
        parameter: &QueryParameter,
        values: &[Value],
    ) -> IdentityResult<Option<B::Predicate>>
    where
        B: CriteriaBuilder,
    {
        use Comparison::*;
        use ModelProperty::*;

        let predicate = match parameter {
            QueryParameter::Enabled => {
                self.scalar(builder, parameter, values, IdentityEnabled, Equal, "bool")?
            }
            QueryParameter::CreatedDate => {
                self.scalar(builder, parameter, values, IdentityCreated, Equal, "timestamp")?
            }
            QueryParameter::ExpiryDate => {
                self.scalar(builder, parameter, values, IdentityExpires, Equal, "timestamp")?
            }
            QueryParameter::CreatedAfter => self.scalar(
                builder,
                parameter,
                values,
                IdentityCreated,
                GreaterThan,
                "timestamp",
            )?,
            QueryParameter::CreatedBefore => {
                self.scalar(builder, parameter, values, IdentityCreated, LessThan, "timestamp")?
            }
            QueryParameter::ExpiryAfter => self.scalar(
                builder,
                parameter,
                values,
                IdentityExpires,
                GreaterThan,
                "timestamp",
            )?,
            QueryParameter::ExpiryBefore => {
                self.scalar(builder, parameter, values, IdentityExpires, LessThan, "timestamp")?
            }
            QueryParameter::Attribute(name) => self.attribute(builder, name, values)?,
            QueryParameter::Other(name) => {
                debug!(parameter = %name, "no predicate rule for parameter, skipping");
                return Ok(None);
            }
        };
        Ok(Some(predicate))
    }

    /// 按顺序编译整个查询，跳过没有规则的参数
    pub fn compile_query<B>(
        &self,
        builder: &B,
        query: &IdentityQuery,
    ) -> IdentityResult<Vec<B::Predicate>>
    where
        B: CriteriaBuilder,
    {
        let mut predicates = Vec::with_capacity(query.len());
        for (parameter, values) in query.iter() {
            if let Some(predicate) = self.compile(builder, parameter, values)? {
                predicates.push(predicate);
            }
        }
        Ok(predicates)
    }

    /// 编译整个查询并合取为一个谓词
    pub fn compile_conjunction<B>(
        &self,
        builder: &B,
        query: &IdentityQuery,
    ) -> IdentityResult<B::Predicate>
    where
        B: CriteriaBuilder,
    {
        let predicates = self.compile_query(builder, query)?;
        Ok(builder.conjunction(predicates))
    }

    fn scalar<B>(
        &self,
        builder: &B,
        parameter: &QueryParameter,
        values: &[Value],
        property: ModelProperty,
        comparison: Comparison,
        expected: &str,
    ) -> IdentityResult<B::Predicate>
    where
        B: CriteriaBuilder,
    {
        let binding = self.config.bindings().require(property)?;
        let value = values
            .first()
            .ok_or_else(|| IdentityError::invalid_query(parameter, "missing value"))?;
        if value.kind() != expected {
            return Err(IdentityError::invalid_query(
                parameter,
                format!("expected {expected}, found {}", value.kind()),
            ));
        }
        if values.len() > 1 {
            trace!(%parameter, ignored = values.len() - 1, "extra scalar values ignored");
        }

        let value = value.clone();
        Ok(match comparison {
            Comparison::Equal => builder.equal(binding, value),
            Comparison::GreaterThan => builder.greater_than(binding, value),
            Comparison::LessThan => builder.less_than(binding, value),
        })
    }

    fn attribute<B>(&self, builder: &B, name: &str, values: &[Value]) -> IdentityResult<B::Predicate>
    where
        B: CriteriaBuilder,
    {
        // 空值列表与存储模式无关，直接恒假
        if values.is_empty() {
            debug!(attribute = name, "attribute parameter without values matches nothing");
            return Ok(builder.disjunction(Vec::new()));
        }

        let bindings = self.config.bindings();
        let owner = bindings.require(ModelProperty::AttributeIdentity)?;
        let name_binding = bindings.require(ModelProperty::AttributeName)?;
        let value_binding = bindings.require(ModelProperty::AttributeValue)?;
        let (_, reference) = bindings.identity_reference()?;

        let values = if self.config.dedupe_attribute_values() {
            let mut distinct: Vec<Value> = Vec::with_capacity(values.len());
            for value in values {
                if !distinct.contains(value) {
                    distinct.push(value.clone());
                }
            }
            if distinct.len() != values.len() {
                debug!(
                    attribute = name,
                    supplied = values.len(),
                    distinct = distinct.len(),
                    "deduplicated attribute values"
                );
            }
            distinct
        } else {
            values.to_vec()
        };
        let count = values.len();

        let restriction = builder.conjunction(vec![
            builder.equal(name_binding, Value::from(name)),
            builder.is_in(value_binding, values),
        ]);
        let subquery = Subquery {
            entity: self.config.attribute_entity().to_string(),
            selection: owner.to_string(),
            restriction,
            having: Some(HavingCount {
                group_by: owner.to_string(),
                count,
            }),
        };

        trace!(attribute = name, count, "compiled attribute predicate");
        Ok(builder.in_subquery(reference, subquery))
    }
}
