// src/db/booking_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        bookings::{Booking, BookingStatus, BookingWithPharmacy},
        inventory::Inventory,
    },
};

// Patient-facing booking access. This side is intentionally not tenant
// scoped: a patient books against any ACTIVE pharmacy's inventory, and
// reads back only their own bookings (filtered by user id instead).
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cross-tenant inventory read used at booking time. Restricted to
    /// ACTIVE pharmacies so a patient cannot reserve from a pending or
    /// rejected one.
    pub async fn find_bookable_inventory(
        &self,
        inventory_id: Uuid,
    ) -> Result<Option<Inventory>, AppError> {
        let inventory = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT i.*
            FROM inventory i
            JOIN tenants t ON t.id = i.tenant_id
            WHERE i.id = $1 AND t.status = 'ACTIVE'
            "#,
        )
        .bind(inventory_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(inventory)
    }

    /// Returns None on a pickup-code collision so the caller can retry
    /// with a fresh code.
    pub async fn try_create_booking<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
        tenant_id: Uuid,
        user_id: Uuid,
        quantity: i32,
        pickup_code: &str,
    ) -> Result<Option<Booking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (inventory_id, tenant_id, user_id, quantity, pickup_code, status)
            VALUES ($1, $2, $3, $4, $5, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(inventory_id)
        .bind(tenant_id)
        .bind(user_id)
        .bind(quantity)
        .bind(pickup_code)
        .fetch_one(executor)
        .await;

        match inserted {
            Ok(booking) => Ok(Some(booking)),
            Err(e) => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return Ok(None);
                    }
                }
                Err(e.into())
            }
        }
    }

    pub async fn find_user_booking(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND user_id = $2",
        )
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Conditional on the status the caller just read, mirroring the
    /// tenant-side transition: a concurrent move invalidates this one.
    pub async fn set_user_booking_status(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    pub async fn list_user_bookings(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingWithPharmacy>, AppError> {
        let rows = sqlx::query_as::<_, BookingWithPharmacy>(
            r#"
            SELECT b.id, b.quantity, b.pickup_code, b.status,
                   m.name AS medicine_name,
                   t.name AS pharmacy_name, t.address AS pharmacy_address,
                   i.price, b.created_at
            FROM bookings b
            JOIN inventory i ON i.id = b.inventory_id
            JOIN medicines m ON m.id = i.medicine_id
            JOIN tenants t ON t.id = b.tenant_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
