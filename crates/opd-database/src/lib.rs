//! # OPD数据库模块
//!
//! 负责门诊业务数据的存储和管理，提供PostgreSQL连接池、表结构初始化、
//! 单据编号分配以及各实体的查询操作。

pub mod codes;
pub mod connection;
pub mod models;
pub mod queries;
pub mod schema;

// 重新导出主要类型
pub use codes::CodeAllocator;
pub use connection::{DatabaseConfig, DatabasePool};
pub use models::*;
pub use queries::{
    DoctorQueries, ExpenseQueries, MrDataQueries, PaymentQueries, ReceiptQueries, ReportQueries,
    ServiceQueries, ShiftCashQueries, ShiftQueries,
};

use opd_core::OpdError;

/// 将sqlx错误映射为系统错误，唯一约束与外键冲突归入业务冲突
pub(crate) fn map_sql_err(e: sqlx::Error) -> OpdError {
    if let Some(db_err) = e.as_database_error() {
        match db_err.code().as_deref() {
            Some("23505") => return OpdError::Conflict("Duplicate entry. This record already exists.".to_string()),
            Some("23503") => return OpdError::Conflict("Referenced record not found.".to_string()),
            _ => {}
        }
    }
    OpdError::Database(e.to_string())
}

/// 判断是否为唯一约束冲突
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code().map(|c| c == "23505"))
        .unwrap_or(false)
}
