use super::Attributes;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// 时间戳类型（UTC）
pub type Timestamp = DateTime<Utc>;

/// 当前时间，供 `#[identity_type]` 生成的构造函数使用
pub fn now() -> Timestamp {
    Utc::now()
}

/// 身份类型抽象
///
/// 仅描述所有变体共有的属性；变体自有字段由具体类型持有，
/// 其存储形态由对应的 `IdentityTypeHandler` 决定。
/// 一般无需手写实现，使用 `#[identity_type]` 宏即可。
pub trait IdentityType:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// 以自然键创建身份：默认启用，创建时间为当前时间，无过期时间
    fn new(key: String) -> Self;

    /// 自然键（创建后不可变）
    fn key(&self) -> &str;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn created_date(&self) -> Timestamp;

    fn set_created_date(&mut self, created_date: Timestamp);

    fn expiration_date(&self) -> Option<Timestamp>;

    fn set_expiration_date(&mut self, expiration_date: Option<Timestamp>);

    fn attributes(&self) -> &Attributes;

    fn attributes_mut(&mut self) -> &mut Attributes;
}
