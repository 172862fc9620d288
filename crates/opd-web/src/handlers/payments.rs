//! 会诊付款处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use opd_core::OpdError;
use opd_database::queries::payments::PaymentFilter;
use opd_database::{NewPayment, PaymentQueries, PaymentUpdate};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PaymentListParams {
    pub date: Option<NaiveDate>,
    pub shift_id: Option<i64>,
    pub doctor_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DoctorSummaryParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaymentListParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = PaymentFilter {
        date: params.date,
        shift_id: params.shift_id,
        doctor_name: params.doctor_name,
    };
    let payments = PaymentQueries::new(&state.db).list(&filter).await?;
    Ok(ApiResponse::ok(payments))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let payment = PaymentQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(payment))
}

pub async fn pending(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let payments = PaymentQueries::new(&state.db).pending().await?;
    Ok(ApiResponse::ok(payments))
}

pub async fn by_doctor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let payments = PaymentQueries::new(&state.db).by_doctor(&name).await?;
    Ok(ApiResponse::ok(payments))
}

pub async fn doctor_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DoctorSummaryParams>,
) -> ApiResult<impl IntoResponse> {
    let start = params
        .start_date
        .ok_or_else(|| OpdError::Validation("start_date is required".to_string()))?;
    let end = params
        .end_date
        .ok_or_else(|| OpdError::Validation("end_date is required".to_string()))?;
    let summary = PaymentQueries::new(&state.db).doctor_summary(start, end).await?;
    Ok(ApiResponse::ok(summary))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewPayment>,
) -> ApiResult<impl IntoResponse> {
    let payment = PaymentQueries::new(&state.db).create(&new).await?;
    Ok(created(payment))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<PaymentUpdate>,
) -> ApiResult<impl IntoResponse> {
    PaymentQueries::new(&state.db).update(id, &update).await?;
    Ok(ApiResponse::<()>::message("Payment updated successfully"))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    PaymentQueries::new(&state.db).delete(id).await?;
    Ok(ApiResponse::<()>::message("Payment deleted successfully"))
}
