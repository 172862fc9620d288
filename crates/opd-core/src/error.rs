//! 错误定义模块

use crate::models::Shift;
use thiserror::Error;

/// OPD系统统一错误类型
#[derive(Error, Debug)]
pub enum OpdError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("数据库不可用: {0}")]
    Unavailable(String),

    #[error("校验错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务冲突: {0}")]
    Conflict(String),

    #[error("存在未关闭班次: shift {}", .0.shift_id)]
    OpenShiftExists(Box<Shift>),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("网络错误: {0}")]
    Network(#[from] std::io::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// OPD系统统一结果类型
pub type Result<T> = std::result::Result<T, OpdError>;
