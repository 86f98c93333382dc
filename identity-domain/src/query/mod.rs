//! 查询谓词编译（query）
//!
//! - 抽象查询参数与参数列表（`QueryParameter`/`IdentityQuery`）；
//! - 谓词构造原语（`CriteriaBuilder`）及默认的中立条件树（`Criteria`/`Condition`）；
//! - 谓词编译器（`PredicateCompiler`），含多值属性的分组计数规则；
//! - 参照语义：内存求值（`InMemoryIdentityStore`）与 SQL 渲染（`sql`）。
//!
mod compiler;
mod criteria;
mod inmemory;
mod parameter;
pub mod sql;

pub use compiler::PredicateCompiler;
pub use criteria::{Condition, Criteria, CriteriaBuilder, HavingCount, Subquery};
pub use inmemory::InMemoryIdentityStore;
pub use parameter::{IdentityQuery, QueryParameter};
