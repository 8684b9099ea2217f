// src/handlers/sales.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::TenantOwner,
    models::sales::LogSalePayload,
};

pub async fn log_sale(
    State(app_state): State<AppState>,
    owner: TenantOwner,
    Json(payload): Json<LogSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let scope = app_state.scoped(owner.tenant_id);
    let sale = app_state
        .sale_service
        .log_sale(&scope, owner.user.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn list_sales(
    State(app_state): State<AppState>,
    owner: TenantOwner,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    let sales = app_state.sale_service.list_sales(&scope).await?;
    Ok((StatusCode::OK, Json(sales)))
}
