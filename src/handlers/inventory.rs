// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::TenantOwner,
    models::inventory::{AddInventoryPayload, UpdateInventoryPayload},
};

pub async fn list_items(
    State(app_state): State<AppState>,
    owner: TenantOwner,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    let items = app_state.inventory_service.list_items(&scope).await?;
    Ok((StatusCode::OK, Json(items)))
}

pub async fn add_item(
    State(app_state): State<AppState>,
    owner: TenantOwner,
    Json(payload): Json<AddInventoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let scope = app_state.scoped(owner.tenant_id);
    let row = app_state
        .inventory_service
        .add_stock(&scope, owner.user.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_item(
    State(app_state): State<AppState>,
    owner: TenantOwner,
    Path(inventory_id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let scope = app_state.scoped(owner.tenant_id);
    let row = app_state
        .inventory_service
        .update_item(&scope, owner.user.id, inventory_id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(row)))
}

pub async fn delete_item(
    State(app_state): State<AppState>,
    owner: TenantOwner,
    Path(inventory_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    app_state
        .inventory_service
        .delete_item(&scope, inventory_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_movements(
    State(app_state): State<AppState>,
    owner: TenantOwner,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    let movements = app_state.inventory_service.list_movements(&scope).await?;
    Ok((StatusCode::OK, Json(movements)))
}
