//! 支出处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use opd_database::queries::expenses::ExpenseFilter;
use opd_database::{ExpenseQueries, ExpenseUpdate, NewExpense};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    pub date: Option<NaiveDate>,
    pub shift_id: Option<i64>,
    pub shift_date: Option<NaiveDate>,
    pub shift_type: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseListParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = ExpenseFilter {
        date: params.date,
        shift_id: params.shift_id,
        shift_date: params.shift_date,
        shift_type: params.shift_type,
    };
    let expenses = ExpenseQueries::new(&state.db).list(&filter).await?;
    Ok(ApiResponse::ok(expenses))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let expense = ExpenseQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(expense))
}

pub async fn by_shift(
    State(state): State<Arc<AppState>>,
    Path(shift_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let expenses = ExpenseQueries::new(&state.db).by_shift(shift_id).await?;
    Ok(ApiResponse::ok(expenses))
}

pub async fn summary_by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<impl IntoResponse> {
    let summary = ExpenseQueries::new(&state.db).summary_by_date(date).await?;
    Ok(ApiResponse::ok(summary))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewExpense>,
) -> ApiResult<impl IntoResponse> {
    let expense = ExpenseQueries::new(&state.db).create(&new).await?;
    Ok(created(expense))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<ExpenseUpdate>,
) -> ApiResult<impl IntoResponse> {
    ExpenseQueries::new(&state.db).update(id, &update).await?;
    Ok(ApiResponse::<()>::message("Expense updated successfully"))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    ExpenseQueries::new(&state.db).delete(id).await?;
    Ok(ApiResponse::<()>::message("Expense deleted successfully"))
}
