//! 班次现金结算处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use opd_database::queries::shift_cash::ShiftCashFilter;
use opd_database::{ShiftCashCorrection, ShiftCashQueries, ShiftQueries};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ShiftCashListParams {
    pub date: Option<NaiveDate>,
    pub shift_type: Option<String>,
}

/// 关班并提交现金结算的一体化请求
#[derive(Debug, Deserialize)]
pub struct CloseShiftCashRequest {
    pub shift_id: i64,
    #[serde(default = "default_operator")]
    pub submit_by: String,
}

fn default_operator() -> String {
    "admin".to_string()
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShiftCashListParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = ShiftCashFilter {
        date: params.date,
        shift_type: params.shift_type,
    };
    let records = ShiftCashQueries::new(&state.db).list(&filter).await?;
    Ok(ApiResponse::ok(records))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let record = ShiftCashQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn by_shift_id(
    State(state): State<Arc<AppState>>,
    Path(shift_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let record = ShiftCashQueries::new(&state.db).by_shift_id(shift_id).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn daily(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<impl IntoResponse> {
    let report = ShiftCashQueries::new(&state.db).daily(date).await?;
    Ok(ApiResponse::ok(report))
}

/// 关班入口之一，与 PUT /api/shifts/:id/close 走同一条事务路径
pub async fn close(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CloseShiftCashRequest>,
) -> ApiResult<impl IntoResponse> {
    let summary = ShiftQueries::new(&state.db)
        .close(req.shift_id, &req.submit_by)
        .await?;
    Ok(created(summary))
}

pub async fn correct(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(correction): Json<ShiftCashCorrection>,
) -> ApiResult<impl IntoResponse> {
    ShiftCashQueries::new(&state.db).correct(id, &correction).await?;
    Ok(ApiResponse::<()>::message("Shift cash record updated successfully"))
}
