//! 报表处理器

use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use opd_core::OpdError;
use opd_database::ReportQueries;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DailyParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ShiftParams {
    pub shift_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct YearlyParams {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn daily(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailyParams>,
) -> ApiResult<impl IntoResponse> {
    let date = params
        .date
        .ok_or_else(|| OpdError::Validation("date is required".to_string()))?;
    let report = ReportQueries::new(&state.db).daily(date).await?;
    Ok(ApiResponse::ok(report))
}

pub async fn shift(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShiftParams>,
) -> ApiResult<impl IntoResponse> {
    let shift_id = params
        .shift_id
        .ok_or_else(|| OpdError::Validation("shift_id is required".to_string()))?;
    let report = ReportQueries::new(&state.db).shift(shift_id).await?;
    Ok(ApiResponse::ok(report))
}

pub async fn monthly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthlyParams>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportQueries::new(&state.db)
        .monthly(params.year, params.month)
        .await?;
    Ok(ApiResponse::ok(report))
}

pub async fn yearly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearlyParams>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportQueries::new(&state.db).yearly(params.year).await?;
    Ok(ApiResponse::ok(report))
}

pub async fn services(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<impl IntoResponse> {
    let start = params
        .start_date
        .ok_or_else(|| OpdError::Validation("start_date is required".to_string()))?;
    let end = params
        .end_date
        .ok_or_else(|| OpdError::Validation("end_date is required".to_string()))?;
    let report = ReportQueries::new(&state.db).services(start, end).await?;
    Ok(ApiResponse::ok(report))
}
