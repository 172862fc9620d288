//! 患者主索引处理器

use crate::response::{created, ApiResponse, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use opd_database::queries::mr_data::MrKey;
use opd_database::{MrDataQueries, MrPatientUpdate, NewMrPatient};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// 检索词，匹配MR号、姓名、电话或身份证号；缺省时列出最近建档
    #[serde(default)]
    pub search: String,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<impl IntoResponse> {
    let patients = MrDataQueries::new(&state.db).search(&params.search).await?;
    Ok(Json(json!({
        "success": true,
        "count": patients.len(),
        "data": patients,
    })))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let profile = MrDataQueries::new(&state.db)
        .profile(&MrKey::parse(&key))
        .await?;
    Ok(ApiResponse::ok(profile))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewMrPatient>,
) -> ApiResult<impl IntoResponse> {
    let patient = MrDataQueries::new(&state.db).create(&new).await?;
    Ok(created(patient))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(update): Json<MrPatientUpdate>,
) -> ApiResult<impl IntoResponse> {
    MrDataQueries::new(&state.db)
        .update(&MrKey::parse(&key), &update)
        .await?;
    Ok(ApiResponse::<()>::message("Patient updated successfully"))
}
