//! 内存版身份存储（InMemoryIdentityStore）
//!
//! 持有身份记录与属性记录，把 `Condition` 树翻译为 `Specification` 链后逐条求值。
//! 求值语义贴近 SQL：属性缺失或为 `Null` 时比较不成立；大小比较只在同类型值之间进行。
//! 典型用途：测试环境与本地开发，作为谓词编译结果的参照语义。
//!
use crate::error::{IdentityError, IdentityResult};
use crate::persist::{GenericRecord, IdentityStoreConfig, Record};
use crate::query::{Condition, Subquery};
use crate::specification::{AllOf, AnyOf, Specification, from_fn};
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::trace;

pub struct InMemoryIdentityStore<R, A = GenericRecord> {
    config: Arc<IdentityStoreConfig>,
    identities: Vec<R>,
    attributes: Vec<A>,
}

impl<R, A> InMemoryIdentityStore<R, A>
where
    R: Record + 'static,
    A: Record + 'static,
{
    pub fn new(config: Arc<IdentityStoreConfig>) -> Self {
        Self {
            config,
            identities: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn insert_identity(&mut self, record: R) {
        self.identities.push(record);
    }

    pub fn insert_attributes(&mut self, records: impl IntoIterator<Item = A>) {
        self.attributes.extend(records);
    }

    pub fn identities(&self) -> &[R] {
        &self.identities
    }

    pub fn attributes(&self) -> &[A] {
        &self.attributes
    }

    /// 选出满足全部条件的身份记录（条件之间为合取）
    pub fn select(&self, conditions: &[Condition]) -> IdentityResult<Vec<&R>> {
        let spec = AllOf::new(
            conditions
                .iter()
                .map(|c| self.specification::<R>(c))
                .collect::<IdentityResult<Vec<_>>>()?,
        );
        let selected: Vec<&R> = self
            .identities
            .iter()
            .filter(|r| spec.is_satisfied_by(*r))
            .collect();
        trace!(
            conditions = conditions.len(),
            selected = selected.len(),
            "evaluated conditions in memory"
        );
        Ok(selected)
    }

    /// 将条件翻译为针对记录类型 `T` 的规约；子查询在翻译时求值
    pub fn specification<T>(&self, condition: &Condition) -> IdentityResult<Box<dyn Specification<T>>>
    where
        T: Record + 'static,
    {
        let spec: Box<dyn Specification<T>> = match condition {
            Condition::Eq { property, value } => {
                let (property, value) = (property.clone(), value.clone());
                Box::new(from_fn(move |r: &T| {
                    r.property(&property).is_some_and(|v| v.sql_eq(&value))
                }))
            }
            Condition::Gt { property, value } => compare(property, value, Ordering::Greater),
            Condition::Lt { property, value } => compare(property, value, Ordering::Less),
            Condition::In { property, values } => {
                let (property, values) = (property.clone(), values.clone());
                Box::new(from_fn(move |r: &T| {
                    r.property(&property)
                        .is_some_and(|v| values.iter().any(|candidate| v.sql_eq(candidate)))
                }))
            }
            Condition::And(conditions) => Box::new(AllOf::new(
                conditions
                    .iter()
                    .map(|c| self.specification::<T>(c))
                    .collect::<IdentityResult<Vec<_>>>()?,
            )),
            Condition::Or(conditions) => Box::new(AnyOf::new(
                conditions
                    .iter()
                    .map(|c| self.specification::<T>(c))
                    .collect::<IdentityResult<Vec<_>>>()?,
            )),
            Condition::InSubquery { property, subquery } => {
                let selected = self.run_subquery(subquery)?;
                let property = property.clone();
                Box::new(from_fn(move |r: &T| {
                    r.property(&property)
                        .is_some_and(|v| !v.is_null() && selected.contains(v))
                }))
            }
        };
        Ok(spec)
    }

    fn run_subquery(&self, subquery: &Subquery<Condition>) -> IdentityResult<HashSet<Value>> {
        if subquery.entity == self.config.attribute_entity() {
            self.select_from(&self.attributes, subquery)
        } else if subquery.entity == self.config.identity_entity() {
            self.select_from(&self.identities, subquery)
        } else {
            Err(IdentityError::invalid_query(
                &subquery.entity,
                "unknown entity in subquery",
            ))
        }
    }

    fn select_from<T>(
        &self,
        records: &[T],
        subquery: &Subquery<Condition>,
    ) -> IdentityResult<HashSet<Value>>
    where
        T: Record + 'static,
    {
        let restriction = self.specification::<T>(&subquery.restriction)?;
        let matching = records.iter().filter(|r| restriction.is_satisfied_by(*r));

        let Some(having) = &subquery.having else {
            return Ok(matching
                .filter_map(|r| non_null(r.property(&subquery.selection)))
                .collect());
        };

        // GROUP BY 忽略分组键为空的行
        let mut groups: HashMap<&Value, Vec<&T>> = HashMap::new();
        for record in matching {
            if let Some(key) = record.property(&having.group_by).filter(|v| !v.is_null()) {
                groups.entry(key).or_default().push(record);
            }
        }

        Ok(groups
            .into_values()
            .filter(|rows| rows.len() == having.count)
            .flatten()
            .filter_map(|r| non_null(r.property(&subquery.selection)))
            .collect())
    }
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn compare<T>(property: &str, value: &Value, expected: Ordering) -> Box<dyn Specification<T>>
where
    T: Record + 'static,
{
    let (property, value) = (property.to_string(), value.clone());
    Box::new(from_fn(move |r: &T| {
        r.property(&property)
            .and_then(|v| v.compare(&value))
            .is_some_and(|ordering| ordering == expected)
    }))
}
