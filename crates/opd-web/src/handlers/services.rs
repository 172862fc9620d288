//! 服务项目处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use opd_database::{NewOpdService, ServiceQueries, ServiceUpdate};
use std::sync::Arc;

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let services = ServiceQueries::new(&state.db).list_active().await?;
    Ok(ApiResponse::ok(services))
}

pub async fn heads(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let heads = ServiceQueries::new(&state.db).heads().await?;
    Ok(ApiResponse::ok(heads))
}

pub async fn by_head(
    State(state): State<Arc<AppState>>,
    Path(head): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let services = ServiceQueries::new(&state.db).by_head(&head).await?;
    Ok(ApiResponse::ok(services))
}

pub async fn by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let service = ServiceQueries::new(&state.db).by_id(id).await?;
    Ok(ApiResponse::ok(service))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewOpdService>,
) -> ApiResult<impl IntoResponse> {
    let service = ServiceQueries::new(&state.db).create(&new).await?;
    Ok(created(service))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<ServiceUpdate>,
) -> ApiResult<impl IntoResponse> {
    ServiceQueries::new(&state.db).update(id, &update).await?;
    Ok(ApiResponse::<()>::message("Service updated successfully"))
}

pub async fn soft_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    ServiceQueries::new(&state.db).soft_delete(id).await?;
    Ok(ApiResponse::<()>::message("Service deactivated successfully"))
}
