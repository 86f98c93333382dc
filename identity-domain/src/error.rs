//! 身份领域统一错误定义
//!
//! 按性质划分为三类：配置错误（绑定缺失、记录无法实例化）、数据完整性错误
//! （既有记录缺少必填公共字段）与查询构造错误（调用方传入的参数不合法）。
//! 三者均为同步翻译过程中的确定性失败，本 crate 内不做任何重试。
//!
use crate::persist::ModelProperty;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IdentityError {
    // --- 配置 ---
    #[error("configuration error: {reason}")]
    Configuration { reason: String },
    #[error("missing property binding: {property}")]
    MissingBinding { property: ModelProperty },
    #[error("record instantiation failed: {reason}")]
    RecordInstantiation { reason: String },
    #[error("identity type not registered: {type_name}")]
    UnregisteredIdentityType { type_name: &'static str },

    // --- 数据完整性 ---
    #[error("required property is null: property={property}, binding={binding}")]
    RequiredPropertyNull {
        property: ModelProperty,
        binding: String,
    },
    #[error("record is missing required property: property={property}, binding={binding}")]
    MissingRecordProperty {
        property: ModelProperty,
        binding: String,
    },
    #[error("unknown discriminator: {discriminator}")]
    UnknownDiscriminator { discriminator: String },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch { expected: String, found: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    // --- 查询 ---
    #[error("invalid query: parameter={parameter}, reason={reason}")]
    InvalidQuery { parameter: String, reason: String },

    // --- 序列化/事件/基础设施 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("event dispatch error: {reason}")]
    EventDispatch { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },
}

impl IdentityError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    pub fn invalid_query(parameter: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    pub fn event_dispatch(reason: impl Into<String>) -> Self {
        Self::EventDispatch {
            reason: reason.into(),
        }
    }

    /// 是否属于配置类错误（致命，应立即上抛）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::MissingBinding { .. }
                | Self::RecordInstantiation { .. }
                | Self::UnregisteredIdentityType { .. }
        )
    }
}

/// 统一 Result 类型别名
pub type IdentityResult<T> = Result<T, IdentityError>;

// 允许在基础设施层直接使用 `?` 将 sqlx 错误转换为 IdentityError
#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::Database {
            reason: err.to_string(),
        }
    }
}
