// src/models/bookings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Ready,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// The full transition table for the fulfillment workflow. READY may
    /// not be skipped on the way to COMPLETED.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Ready) | (Ready, Completed) | (Pending, Cancelled) | (Ready, Cancelled)
        )
    }
}

// A soft reservation: creating one checks stock but never decrements it.
// Stock is only debited when the pharmacy logs a real sale.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub pickup_code: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Joined row for the pharmacy-side bookings page.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithDetails {
    pub id: Uuid,
    pub quantity: i32,
    pub pickup_code: String,
    pub status: BookingStatus,
    pub medicine_name: String,
    pub patient_email: String,
    pub created_at: DateTime<Utc>,
}

// Joined row for the patient-side list.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithPharmacy {
    pub id: Uuid,
    pub quantity: i32,
    pub pickup_code: String,
    pub status: BookingStatus,
    pub medicine_name: String,
    pub pharmacy_name: String,
    pub pharmacy_address: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    pub inventory_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusPayload {
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn happy_path_transitions() {
        assert!(Pending.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Completed));
    }

    #[test]
    fn cancellation_is_allowed_before_completion() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Cancelled));
    }

    #[test]
    fn ready_cannot_be_skipped() {
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, Ready, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn no_self_or_backward_transitions() {
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Ready));
    }
}
