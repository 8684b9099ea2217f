// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, middleware::auth::AdminUser};

pub async fn list_pending_pharmacies(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state.tenancy_service.list_pending().await?;
    Ok((StatusCode::OK, Json(tenants)))
}

pub async fn approve_pharmacy(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenancy_service.approve_pharmacy(tenant_id).await?;
    Ok((StatusCode::OK, Json(tenant)))
}

pub async fn reject_pharmacy(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenancy_service.reject_pharmacy(tenant_id).await?;
    Ok((StatusCode::OK, Json(tenant)))
}
