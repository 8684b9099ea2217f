// src/handlers/search.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub category: Option<String>,
}

pub async fn search_medicines(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let results = app_state
        .search_service
        .search_medicines(&params.query, params.category.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(results)))
}

pub async fn pharmacy_page(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.search_service.pharmacy_by_slug(&slug).await?;
    Ok((StatusCode::OK, Json(page)))
}
