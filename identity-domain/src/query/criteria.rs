//! 谓词构造原语（CriteriaBuilder）与中立条件树（Condition）
//!
//! 编译器只调用 `CriteriaBuilder` 的原语：比较、集合成员、合取/析取以及
//! “值属于子查询结果”的关联选择。具体存储后端可实现该 trait 直接产出自己的谓词类型；
//! 默认实现 `Criteria` 产出与后端无关的 `Condition` 树，可交给内存存储求值或渲染为 SQL。
//!
use crate::value::Value;
use serde::{Deserialize, Serialize};

pub trait CriteriaBuilder {
    type Predicate;

    fn equal(&self, property: &str, value: Value) -> Self::Predicate;

    /// 严格大于
    fn greater_than(&self, property: &str, value: Value) -> Self::Predicate;

    /// 严格小于
    fn less_than(&self, property: &str, value: Value) -> Self::Predicate;

    fn is_in(&self, property: &str, values: Vec<Value>) -> Self::Predicate;

    /// 合取；空列表恒为真
    fn conjunction(&self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    /// 析取；空列表恒为假
    fn disjunction(&self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    /// `property IN (subquery)`
    fn in_subquery(&self, property: &str, subquery: Subquery<Self::Predicate>) -> Self::Predicate;
}

/// 子查询：`SELECT selection FROM entity WHERE restriction [GROUP BY .. HAVING COUNT(*) = n]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subquery<P> {
    pub entity: String,
    pub selection: String,
    pub restriction: P,
    pub having: Option<HavingCount>,
}

/// 分组计数约束：按 `group_by` 分组后只保留行数恰为 `count` 的组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HavingCount {
    pub group_by: String,
    pub count: usize,
}

/// 与后端无关的条件树
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Eq { property: String, value: Value },
    Gt { property: String, value: Value },
    Lt { property: String, value: Value },
    In { property: String, values: Vec<Value> },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    InSubquery {
        property: String,
        subquery: Box<Subquery<Condition>>,
    },
}

impl Condition {
    /// 恒真（空合取）
    pub fn always() -> Self {
        Condition::And(Vec::new())
    }

    /// 恒假（空析取）
    pub fn never() -> Self {
        Condition::Or(Vec::new())
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Condition::Or(c) if c.is_empty())
    }
}

/// 产出 `Condition` 的默认构造器
#[derive(Debug, Clone, Copy, Default)]
pub struct Criteria;

impl CriteriaBuilder for Criteria {
    type Predicate = Condition;

    fn equal(&self, property: &str, value: Value) -> Condition {
        Condition::Eq {
            property: property.to_string(),
            value,
        }
    }

    fn greater_than(&self, property: &str, value: Value) -> Condition {
        Condition::Gt {
            property: property.to_string(),
            value,
        }
    }

    fn less_than(&self, property: &str, value: Value) -> Condition {
        Condition::Lt {
            property: property.to_string(),
            value,
        }
    }

    fn is_in(&self, property: &str, values: Vec<Value>) -> Condition {
        Condition::In {
            property: property.to_string(),
            values,
        }
    }

    fn conjunction(&self, predicates: Vec<Condition>) -> Condition {
        Condition::And(predicates)
    }

    fn disjunction(&self, predicates: Vec<Condition>) -> Condition {
        Condition::Or(predicates)
    }

    fn in_subquery(&self, property: &str, subquery: Subquery<Condition>) -> Condition {
        Condition::InSubquery {
            property: property.to_string(),
            subquery: Box::new(subquery),
        }
    }
}
