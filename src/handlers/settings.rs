// src/handlers/settings.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::TenantOwner,
    models::tenancy::UpdateSettingsPayload,
};

pub async fn update_settings(
    State(app_state): State<AppState>,
    owner: TenantOwner,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let scope = app_state.scoped(owner.tenant_id);
    let tenant = app_state
        .tenancy_service
        .update_settings(&scope, &payload)
        .await?;
    Ok((StatusCode::OK, Json(tenant)))
}
