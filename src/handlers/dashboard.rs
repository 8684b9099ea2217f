// src/handlers/dashboard.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{common::error::AppError, config::AppState, middleware::auth::TenantOwner};

pub async fn overview(
    State(app_state): State<AppState>,
    owner: TenantOwner,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    let stats = app_state.inventory_service.overview(&scope).await?;
    Ok((StatusCode::OK, Json(stats)))
}
