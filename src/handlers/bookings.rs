// src/handlers/bookings.rs

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
    middleware::auth::{AuthenticatedUser, TenantOwner},
    models::bookings::{CreateBookingPayload, UpdateBookingStatusPayload},
};

// ---
// Patient side
// ---

pub async fn create_booking(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let booking = app_state
        .booking_service
        .create_booking(user.0.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn my_bookings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = app_state.booking_service.list_for_patient(user.0.id).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

pub async fn cancel_booking(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = app_state
        .booking_service
        .cancel_own(user.0.id, booking_id)
        .await?;
    Ok((StatusCode::OK, Json(booking)))
}

// ---
// Pharmacy side
// ---

pub async fn pharmacy_bookings(
    State(app_state): State<AppState>,
    owner: TenantOwner,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    let bookings = app_state.booking_service.list_for_pharmacy(&scope).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

pub async fn update_booking_status(
    State(app_state): State<AppState>,
    owner: TenantOwner,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.scoped(owner.tenant_id);
    let booking = app_state
        .booking_service
        .update_status(&scope, booking_id, payload.status)
        .await?;
    Ok((StatusCode::OK, Json(booking)))
}
