//! HTTP处理器
//!
//! 每个处理器只做参数提取、查询调用和响应封装。

pub mod doctors;
pub mod expenses;
pub mod mr_data;
pub mod payments;
pub mod receipts;
pub mod reports;
pub mod services;
pub mod shift_cash;
pub mod shifts;

use crate::response::{ApiResult, ApiError};
use crate::server::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

fn api_root_body() -> serde_json::Value {
    json!({
        "service": "HIMS OPD API",
        "version": "1.0.0",
        "status": "running",
        "endpoints": {
            "health": "/health",
            "shifts": "/api/shifts",
            "opd": "/api/opd-patient-data",
            "expenses": "/api/expenses",
            "payments": "/api/consultant-payments",
            "doctors": "/api/doctors",
            "services": "/api/opd-services",
            "mr": "/api/mr-data",
            "shift_cash": "/api/opd-shift-cash",
            "reports": "/api/reports"
        }
    })
}

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(api_root_body())
}

fn health_body() -> serde_json::Value {
    json!({
        "success": true,
        "status": "healthy",
        "database": "connected",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
}

/// 健康检查处理器，连带探测数据库连通性
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    state.db.ping().await.map_err(ApiError::from)?;
    Ok(Json(health_body()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 健康检查与其他成功响应同走 {success: true, ...} 封套
    #[test]
    fn test_health_body_carries_success_envelope() {
        let body = health_body();
        assert_eq!(body["success"], serde_json::Value::Bool(true));
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    // 根路径广告的端点必须与实际挂载的路由前缀一致
    #[test]
    fn test_api_root_advertises_mounted_routes() {
        let endpoints = &api_root_body()["endpoints"];
        assert_eq!(endpoints["opd"], "/api/opd-patient-data");
        assert_eq!(endpoints["payments"], "/api/consultant-payments");
        assert_eq!(endpoints["services"], "/api/opd-services");
        assert_eq!(endpoints["mr"], "/api/mr-data");
        assert_eq!(endpoints["shift_cash"], "/api/opd-shift-cash");
    }
}
