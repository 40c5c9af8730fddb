use bigdecimal::BigDecimal;
use thiserror::Error;

/// 应用错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{entity} {name} not found")]
    NotFound { entity: &'static str, name: String },

    #[error("{0}")]
    Validation(String),

    /// 超量收货/开票, 消息直接展示给用户
    #[error("Over-delivery not allowed for {item_code}: {received} > {allowed} ({allowance}% allowance)")]
    OverDelivery {
        item_code: String,
        received: BigDecimal,
        allowed: BigDecimal,
        allowance: BigDecimal,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        AppError::NotFound {
            entity,
            name: name.into(),
        }
    }
}
