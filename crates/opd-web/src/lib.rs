//! # OPD Web模块
//!
//! 门诊收费系统的HTTP接口层，基于axum实现。处理器保持薄封装，
//! 业务语义都在数据库层的查询操作里。

pub mod handlers;
pub mod response;
pub mod server;

pub use response::{ApiError, ApiResponse, ApiResult};
pub use server::{AppState, WebServer};
