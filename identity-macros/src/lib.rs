//! 身份领域过程宏（identity-macros）
//!
//! - `#[identity_type]`：为身份变体（用户、组、角色……）注入公共字段并实现 `IdentityType`
//! - `#[value_object]`：为值对象合并标准派生
//!
use proc_macro::TokenStream;

mod identity_type;
mod utils;
mod value_object;

/// 身份类型宏
///
/// 注入 `key`、`enabled`、`created_date`、`expiration_date`、`attributes` 五个公共字段（若缺失），
/// 并实现 `::identity_domain::model::IdentityType`。变体自有字段保持原有顺序排在其后。
///
/// ```ignore
/// #[identity_type]
/// pub struct Agent {
///     pub login_name: String,
/// }
///
/// let agent = Agent::new("agent-1".to_string());
/// assert!(agent.is_enabled());
/// ```
#[proc_macro_attribute]
pub fn identity_type(attr: TokenStream, item: TokenStream) -> TokenStream {
    identity_type::expand(attr, item)
}

/// 值对象宏：合并 Debug/Default/Clone/Serialize/Deserialize/PartialEq/Eq 派生
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
