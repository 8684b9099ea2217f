// src/services/booking_service.rs

use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, TenantScoped},
    models::bookings::{
        Booking, BookingStatus, BookingWithDetails, BookingWithPharmacy, CreateBookingPayload,
    },
};

const PICKUP_CODE_LEN: usize = 6;
const PICKUP_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PICKUP_CODE_ATTEMPTS: usize = 5;

/// Short, human-enterable code handed to the patient for in-person
/// pickup verification.
pub fn generate_pickup_code() -> String {
    let mut rng = rand::thread_rng();
    (0..PICKUP_CODE_LEN)
        .map(|_| PICKUP_CODE_ALPHABET[rng.gen_range(0..PICKUP_CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Clone)]
pub struct BookingService {
    booking_repo: BookingRepository,
    pool: PgPool,
}

impl BookingService {
    pub fn new(booking_repo: BookingRepository, pool: PgPool) -> Self {
        Self { booking_repo, pool }
    }

    /// A booking is a soft reservation: it checks stock at creation time
    /// but never decrements it. Stock is only debited when the pharmacy
    /// logs the actual sale at pickup.
    pub async fn create_booking(
        &self,
        patient_id: Uuid,
        payload: &CreateBookingPayload,
    ) -> Result<Booking, AppError> {
        let inventory = self
            .booking_repo
            .find_bookable_inventory(payload.inventory_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if inventory.quantity < payload.quantity {
            return Err(AppError::InsufficientStock);
        }

        // The booking's tenant comes from the inventory row itself, never
        // from client input.
        for _ in 0..PICKUP_CODE_ATTEMPTS {
            let code = generate_pickup_code();
            if let Some(booking) = self
                .booking_repo
                .try_create_booking(
                    &self.pool,
                    inventory.id,
                    inventory.tenant_id,
                    patient_id,
                    payload.quantity,
                    &code,
                )
                .await?
            {
                return Ok(booking);
            }
            // Code collided with an existing booking, try a fresh one.
        }

        Err(AppError::InternalServerError(anyhow::anyhow!(
            "could not allocate a unique pickup code"
        )))
    }

    /// Pharmacy-side transition. A booking belonging to another tenant
    /// is reported as NotFound, indistinguishable from one that does not
    /// exist.
    pub async fn update_status(
        &self,
        scope: &TenantScoped,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = scope
            .find_booking(scope.pool(), booking_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !booking.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to: new_status,
            });
        }

        // Conditional on the status we just read; a concurrent transition
        // in between means the move we validated no longer applies.
        scope
            .update_booking_status(scope.pool(), booking_id, booking.status, new_status)
            .await?
            .ok_or(AppError::InvalidTransition {
                from: booking.status,
                to: new_status,
            })
    }

    /// Patient-side cancel of their own booking, allowed from PENDING or
    /// READY only.
    pub async fn cancel_own(&self, patient_id: Uuid, booking_id: Uuid) -> Result<Booking, AppError> {
        let booking = self
            .booking_repo
            .find_user_booking(booking_id, patient_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Cancelled,
            });
        }

        // Conditional on the status just read; if the pharmacy completed
        // the pickup in the meantime, the cancel no longer applies.
        self.booking_repo
            .set_user_booking_status(
                booking_id,
                patient_id,
                booking.status,
                BookingStatus::Cancelled,
            )
            .await?
            .ok_or(AppError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Cancelled,
            })
    }

    pub async fn list_for_pharmacy(
        &self,
        scope: &TenantScoped,
    ) -> Result<Vec<BookingWithDetails>, AppError> {
        scope.list_bookings().await
    }

    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<BookingWithPharmacy>, AppError> {
        self.booking_repo.list_user_bookings(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickup_code_is_six_uppercase_alphanumerics() {
        for _ in 0..100 {
            let code = generate_pickup_code();
            assert_eq!(code.len(), 6);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn pickup_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_pickup_code()).collect();
        // 36^6 possibilities; 50 draws colliding into one bucket would
        // mean a broken generator.
        assert!(codes.len() > 1);
    }
}
