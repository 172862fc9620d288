//! 统一响应信封与错误映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use opd_core::OpdError;
use serde::Serialize;
use serde_json::json;

/// 所有接口共用的响应信封
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    pub fn message(msg: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(msg.into()),
        })
    }
}

/// 新建资源的201响应
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, ApiResponse::ok(data))
}

/// 处理器统一返回类型
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 错误到HTTP响应的包装（孤儿规则下不能直接为核心错误实现IntoResponse）
#[derive(Debug)]
pub struct ApiError(pub OpdError);

impl From<OpdError> for ApiError {
    fn from(e: OpdError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            OpdError::NotFound(_) => StatusCode::NOT_FOUND,
            OpdError::Validation(_)
            | OpdError::Conflict(_)
            | OpdError::OpenShiftExists(_) => StatusCode::BAD_REQUEST,
            OpdError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = match self.0 {
            // 前端依赖 current_shift 提示收银员先去关班
            OpdError::OpenShiftExists(shift) => Json(json!({
                "success": false,
                "message": "An open shift already exists. Please close it before opening a new shift.",
                "current_shift": *shift,
            })),
            OpdError::NotFound(msg)
            | OpdError::Validation(msg)
            | OpdError::Conflict(msg)
            | OpdError::Unavailable(msg) => Json(json!({
                "success": false,
                "message": msg,
            })),
            other => Json(json!({
                "success": false,
                "message": other.to_string(),
            })),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use opd_core::{Shift, ShiftType};

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ApiError(OpdError::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(OpdError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(OpdError::Conflict("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(OpdError::Unavailable("x".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(OpdError::Database("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_open_shift_conflict_maps_to_bad_request() {
        let shift = Shift {
            shift_id: 1,
            shift_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            shift_type: ShiftType::Morning,
            shift_start_time: Utc::now(),
            shift_end_time: None,
            opened_by: "reception".to_string(),
            closed_by: None,
            is_closed: false,
        };
        let err = ApiError(OpdError::OpenShiftExists(Box::new(shift)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_envelope_skips_absent_fields() {
        let body = serde_json::to_value(ApiResponse::<i32>::message("done").0).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "done");
        assert!(body.get("data").is_none());
    }
}
