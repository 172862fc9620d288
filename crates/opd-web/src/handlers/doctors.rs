//! 医生档案处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use opd_database::{DoctorQueries, DoctorUpdate, NewDoctor};
use std::sync::Arc;

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let doctors = DoctorQueries::new(&state.db).list_active().await?;
    Ok(ApiResponse::ok(doctors))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let doctor = DoctorQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(doctor))
}

pub async fn departments(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let departments = DoctorQueries::new(&state.db).departments().await?;
    Ok(ApiResponse::ok(departments))
}

pub async fn by_department(
    State(state): State<Arc<AppState>>,
    Path(department): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let doctors = DoctorQueries::new(&state.db).by_department(&department).await?;
    Ok(ApiResponse::ok(doctors))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewDoctor>,
) -> ApiResult<impl IntoResponse> {
    let doctor = DoctorQueries::new(&state.db).create(&new).await?;
    Ok(created(doctor))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<DoctorUpdate>,
) -> ApiResult<impl IntoResponse> {
    DoctorQueries::new(&state.db).update(id, &update).await?;
    Ok(ApiResponse::<()>::message("Doctor updated successfully"))
}

pub async fn soft_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    DoctorQueries::new(&state.db).soft_delete(id).await?;
    Ok(ApiResponse::<()>::message("Doctor deactivated successfully"))
}
