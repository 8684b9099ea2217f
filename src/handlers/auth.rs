// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, LoginPayload, RegisterCustomerPayload, RegisterPharmacyPayload,
    },
};

pub async fn register_pharmacy(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPharmacyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state.auth_service.register_pharmacy(&payload).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn register_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state.auth_service.register_customer(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state.auth_service.login(&payload).await?;
    Ok((StatusCode::OK, Json(AuthResponse { token })))
}

pub async fn get_me(user: AuthenticatedUser) -> impl IntoResponse {
    Json(user.0)
}
