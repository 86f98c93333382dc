//! 身份变体扩展点（IdentityTypeHandler）
//!
//! 记录映射器只处理公共字段；每个身份变体通过实现本 trait 控制自己的存储形态：
//! 变体对象的重建、变体字段的写入与读取、删除前清理以及生命周期事件内容。
//!
use crate::domain_event::IdentityEvent;
use crate::error::IdentityResult;
use crate::model::{IdentityType, Partition};
use crate::persist::Record;

pub trait IdentityTypeHandler<R: Record>: Send + Sync {
    /// 该处理器负责的身份变体
    type Identity: IdentityType;

    /// 按鉴别值与自然键创建“空但已定型”的领域对象
    ///
    /// 公共字段（启用、创建/过期时间）随后由映射器覆盖。
    fn create_identity(
        &self,
        partition: Option<&Partition>,
        discriminator: &str,
        key: String,
    ) -> IdentityResult<Self::Identity>;

    /// 写入变体字段
    fn populate_extra(&self, record: &mut R, identity: &Self::Identity) -> IdentityResult<()>;

    /// 读取变体字段
    fn read_extra(&self, record: &R, identity: &mut Self::Identity) -> IdentityResult<()>;

    /// 删除记录前的清理（例如移除依赖行），默认无操作
    fn before_remove(&self, _record: &R, _identity: &Self::Identity) -> IdentityResult<()> {
        Ok(())
    }

    fn created_event(&self, identity: &Self::Identity) -> IdentityResult<IdentityEvent> {
        IdentityEvent::created(identity)
    }

    fn updated_event(&self, identity: &Self::Identity) -> IdentityResult<IdentityEvent> {
        IdentityEvent::updated(identity)
    }

    fn deleted_event(&self, identity: &Self::Identity) -> IdentityResult<IdentityEvent> {
        Ok(IdentityEvent::deleted(identity))
    }
}
