//! 班次处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use opd_core::ShiftType;
use opd_database::queries::shifts::ShiftFilter;
use opd_database::ShiftQueries;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ShiftListParams {
    pub date: Option<NaiveDate>,
    pub is_closed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct OpenShiftRequest {
    pub shift_date: NaiveDate,
    pub shift_type: ShiftType,
    #[serde(default = "default_operator")]
    pub opened_by: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseShiftRequest {
    #[serde(default = "default_operator")]
    pub closed_by: String,
}

fn default_operator() -> String {
    "admin".to_string()
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShiftListParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = ShiftFilter {
        date: params.date,
        is_closed: params.is_closed,
    };
    let shifts = ShiftQueries::new(&state.db).list(&filter).await?;
    Ok(ApiResponse::ok(shifts))
}

pub async fn current(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let shift = ShiftQueries::new(&state.db).current().await?;
    Ok(ApiResponse::ok(shift))
}

pub async fn by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<impl IntoResponse> {
    let shifts = ShiftQueries::new(&state.db).by_date(date).await?;
    Ok(ApiResponse::ok(shifts))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let shift = ShiftQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(shift))
}

pub async fn open(
    State(state): State<Arc<AppState>>,
    axum::Json(req): axum::Json<OpenShiftRequest>,
) -> ApiResult<impl IntoResponse> {
    let shift = ShiftQueries::new(&state.db)
        .open(req.shift_date, req.shift_type, &req.opened_by)
        .await?;
    Ok(created(shift))
}

pub async fn close(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    req: Option<axum::Json<CloseShiftRequest>>,
) -> ApiResult<impl IntoResponse> {
    let closed_by = req.map(|r| r.0.closed_by).unwrap_or_else(default_operator);
    let summary = ShiftQueries::new(&state.db).close(id, &closed_by).await?;
    Ok(ApiResponse::ok(summary))
}
