//! OPD票据处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use opd_database::queries::receipts::ReceiptFilter;
use opd_database::{NewReceipt, ReceiptQueries, ReceiptUpdate};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ReceiptListParams {
    pub date: Option<NaiveDate>,
    pub shift_id: Option<i64>,
    pub shift_date: Option<NaiveDate>,
    pub mr_number: Option<String>,
    pub opd_cancelled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub cancel_details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub refund_reason: Option<String>,
    pub refund_amount: f64,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReceiptListParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = ReceiptFilter {
        date: params.date,
        shift_id: params.shift_id,
        shift_date: params.shift_date,
        mr_number: params.mr_number,
        opd_cancelled: params.opd_cancelled,
    };
    let receipts = ReceiptQueries::new(&state.db).list(&filter).await?;
    Ok(ApiResponse::ok(receipts))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let receipt = ReceiptQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(receipt))
}

pub async fn by_mr_number(
    State(state): State<Arc<AppState>>,
    Path(mr_number): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let receipts = ReceiptQueries::new(&state.db).by_mr_number(&mr_number).await?;
    Ok(ApiResponse::ok(receipts))
}

pub async fn by_shift(
    State(state): State<Arc<AppState>>,
    Path(shift_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let receipts = ReceiptQueries::new(&state.db).by_shift(shift_id).await?;
    Ok(ApiResponse::ok(receipts))
}

pub async fn shift_summary(
    State(state): State<Arc<AppState>>,
    Path(shift_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let summary = ReceiptQueries::new(&state.db).shift_summary(shift_id).await?;
    Ok(ApiResponse::ok(summary))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewReceipt>,
) -> ApiResult<impl IntoResponse> {
    let receipt = ReceiptQueries::new(&state.db).create(&new).await?;
    Ok(created(receipt))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<ReceiptUpdate>,
) -> ApiResult<impl IntoResponse> {
    ReceiptQueries::new(&state.db).update(id, &update).await?;
    Ok(ApiResponse::<()>::message("Record updated successfully"))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    req: Option<Json<CancelRequest>>,
) -> ApiResult<impl IntoResponse> {
    let details = req.and_then(|r| r.0.cancel_details);
    ReceiptQueries::new(&state.db)
        .cancel(id, details.as_deref())
        .await?;
    Ok(ApiResponse::<()>::message("Receipt cancelled successfully"))
}

pub async fn refund(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<RefundRequest>,
) -> ApiResult<impl IntoResponse> {
    ReceiptQueries::new(&state.db)
        .refund(id, req.refund_reason.as_deref(), req.refund_amount)
        .await?;
    Ok(ApiResponse::<()>::message("Refund recorded successfully"))
}

pub async fn mark_paid_to_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    ReceiptQueries::new(&state.db).mark_paid_to_doctor(id).await?;
    Ok(ApiResponse::<()>::message("Marked as paid to doctor"))
}
