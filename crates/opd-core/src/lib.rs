//! # OPD Core
//!
//! OPD门诊管理系统的核心模块，提供基础数据结构、错误定义和业务计算工具。

pub mod codes;
pub mod error;
pub mod models;
pub mod money;

pub use error::{OpdError, Result};
pub use models::*;
pub use money::{ExpenseAggregates, OpdAggregates, ReceiptTotals};
