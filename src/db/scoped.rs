// src/db/scoped.rs

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        bookings::{Booking, BookingStatus, BookingWithDetails},
        inventory::{Inventory, InventoryWithMedicine, StockMovement, StockMovementType},
        sales::{Sale, SaleItem, SaleWithItem},
        tenancy::{OpeningHours, Tenant},
    },
};

/// The tenant-scoped accessor: the only way to touch inventory, stock
/// movements, sales, tenant-side bookings or own-tenant settings.
///
/// The tenant id is fixed at construction (always from the authenticated
/// session, never from client input) and every statement below binds it
/// into the WHERE clause. A row that belongs to another tenant is
/// indistinguishable from a row that does not exist: both come back as
/// zero rows and surface as `NotFound`. There is no method on this type
/// that can skip the filter.
#[derive(Clone)]
pub struct TenantScoped {
    pool: PgPool,
    tenant_id: Uuid,
}

// Upsert result row: the inventory columns plus the created-vs-updated
// flag Postgres derives from the row's transaction id.
#[derive(sqlx::FromRow)]
struct UpsertedInventory {
    #[sqlx(flatten)]
    inventory: Inventory,
    inserted: bool,
}

impl TenantScoped {
    pub fn new(pool: PgPool, tenant_id: Uuid) -> Self {
        Self { pool, tenant_id }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---
    // Inventory
    // ---

    pub async fn list_inventory(&self) -> Result<Vec<InventoryWithMedicine>, AppError> {
        let rows = sqlx::query_as::<_, InventoryWithMedicine>(
            r#"
            SELECT i.id, i.tenant_id, i.medicine_id, i.price, i.quantity,
                   i.low_stock_threshold, i.batch_number, i.expiry_date,
                   m.name AS medicine_name, m.generic_name, m.category,
                   i.updated_at
            FROM inventory i
            JOIN medicines m ON m.id = i.medicine_id
            WHERE i.tenant_id = $1
            ORDER BY m.name ASC
            "#,
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_inventory<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
    ) -> Result<Option<Inventory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Inventory>(
            "SELECT * FROM inventory WHERE id = $1 AND tenant_id = $2",
        )
        .bind(inventory_id)
        .bind(self.tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Same lookup with a row lock, for transactions that go on to
    /// compute a delta against the quantity they are about to overwrite.
    pub async fn find_inventory_for_update<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
    ) -> Result<Option<Inventory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Inventory>(
            "SELECT * FROM inventory WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(inventory_id)
        .bind(self.tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Additive upsert keyed on (tenant_id, medicine_id). On conflict the
    /// quantity is incremented in a single statement, so two concurrent
    /// restocks cannot lose an update. The returned flag is true when the
    /// row was created rather than incremented, decided by the statement
    /// itself rather than a separate existence read.
    pub async fn upsert_inventory<'e, E>(
        &self,
        executor: E,
        medicine_id: Uuid,
        price: Decimal,
        quantity_delta: i32,
        low_stock_threshold: i32,
        batch_number: Option<&str>,
        expiry_date: Option<chrono::NaiveDate>,
    ) -> Result<(Inventory, bool), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, UpsertedInventory>(
            r#"
            INSERT INTO inventory
                (tenant_id, medicine_id, price, quantity, low_stock_threshold, batch_number, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (tenant_id, medicine_id)
            DO UPDATE SET
                price = EXCLUDED.price,
                quantity = inventory.quantity + EXCLUDED.quantity,
                low_stock_threshold = EXCLUDED.low_stock_threshold,
                batch_number = EXCLUDED.batch_number,
                expiry_date = EXCLUDED.expiry_date,
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(self.tenant_id)
        .bind(medicine_id)
        .bind(price)
        .bind(quantity_delta)
        .bind(low_stock_threshold)
        .bind(batch_number)
        .bind(expiry_date)
        .fetch_one(executor)
        .await?;
        Ok((row.inventory, row.inserted))
    }

    /// Absolute overwrite used by the manual edit form.
    pub async fn set_inventory<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
        price: Decimal,
        quantity: i32,
        low_stock_threshold: i32,
        batch_number: Option<&str>,
        expiry_date: Option<chrono::NaiveDate>,
    ) -> Result<Inventory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Inventory>(
            r#"
            UPDATE inventory
            SET price = $3, quantity = $4, low_stock_threshold = $5,
                batch_number = $6, expiry_date = $7, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(inventory_id)
        .bind(self.tenant_id)
        .bind(price)
        .bind(quantity)
        .bind(low_stock_threshold)
        .bind(batch_number)
        .bind(expiry_date)
        .fetch_optional(executor)
        .await?;
        row.ok_or(AppError::NotFound)
    }

    /// The concurrency-critical primitive: one conditional UPDATE whose
    /// affected-row count is the sole success signal. Two concurrent
    /// sales against the same row can never both pass a stale stock
    /// check, because the check and the write are the same statement.
    pub async fn decrement_atomic<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
        amount: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET quantity = quantity - $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND quantity >= $3
            "#,
        )
        .bind(inventory_id)
        .bind(self.tenant_id)
        .bind(amount)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InsufficientStock);
        }
        Ok(())
    }

    pub async fn delete_inventory<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1 AND tenant_id = $2")
            .bind(inventory_id)
            .bind(self.tenant_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // ---
    // Stock movement ledger
    // ---

    /// Appends a ledger entry. The INSERT selects from the inventory row
    /// itself, so a movement can only ever be written against a row the
    /// scope owns; anything else is `NotFound`. Always called inside the
    /// same transaction as the quantity change it records.
    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        inventory_id: Uuid,
        user_id: Option<Uuid>,
        movement_type: StockMovementType,
        quantity: i32,
        reason: Option<&str>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (inventory_id, user_id, movement_type, quantity, reason)
            SELECT i.id, $3, $4, $5, $6
            FROM inventory i
            WHERE i.id = $1 AND i.tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(inventory_id)
        .bind(self.tenant_id)
        .bind(user_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(reason)
        .fetch_optional(executor)
        .await?;
        movement.ok_or(AppError::NotFound)
    }

    pub async fn list_movements(&self) -> Result<Vec<StockMovement>, AppError> {
        let rows = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT sm.*
            FROM stock_movements sm
            JOIN inventory i ON i.id = sm.inventory_id
            WHERE i.tenant_id = $1
            ORDER BY sm.created_at DESC
            "#,
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---
    // Sales
    // ---

    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        total_amount: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            "INSERT INTO sales (tenant_id, total_amount) VALUES ($1, $2) RETURNING *",
        )
        .bind(self.tenant_id)
        .bind(total_amount)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn create_sale_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        inventory_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, inventory_id, quantity, unit_price)
            SELECT s.id, $3, $4, $5
            FROM sales s
            WHERE s.id = $1 AND s.tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(self.tenant_id)
        .bind(inventory_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_optional(executor)
        .await?;
        item.ok_or(AppError::NotFound)
    }

    pub async fn list_sales(&self) -> Result<Vec<SaleWithItem>, AppError> {
        let rows = sqlx::query_as::<_, SaleWithItem>(
            r#"
            SELECT s.id, s.total_amount, si.quantity, si.unit_price,
                   m.name AS medicine_name, s.created_at
            FROM sales s
            JOIN sale_items si ON si.sale_id = s.id
            JOIN inventory i ON i.id = si.inventory_id
            JOIN medicines m ON m.id = i.medicine_id
            WHERE s.tenant_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Sum of this tenant's sale totals since midnight, server time.
    pub async fn sales_today_total(&self) -> Result<Decimal, AppError> {
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM sales
            WHERE tenant_id = $1 AND created_at >= date_trunc('day', NOW())
            "#,
        )
        .bind(self.tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // ---
    // Bookings (pharmacy side)
    // ---

    pub async fn find_booking<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND tenant_id = $2",
        )
        .bind(booking_id)
        .bind(self.tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(booking)
    }

    /// Conditional on the expected prior status, so two concurrent
    /// transitions on the same booking cannot both apply.
    pub async fn update_booking_status<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(self.tenant_id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await?;
        Ok(booking)
    }

    pub async fn list_bookings(&self) -> Result<Vec<BookingWithDetails>, AppError> {
        let rows = sqlx::query_as::<_, BookingWithDetails>(
            r#"
            SELECT b.id, b.quantity, b.pickup_code, b.status,
                   m.name AS medicine_name, u.email AS patient_email,
                   b.created_at
            FROM bookings b
            JOIN inventory i ON i.id = b.inventory_id
            JOIN medicines m ON m.id = i.medicine_id
            JOIN users u ON u.id = b.user_id
            WHERE b.tenant_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---
    // Own-tenant settings
    // ---

    pub async fn update_tenant_settings<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: &str,
        opening_hours: Option<&OpeningHours>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = $2, address = $3, opening_hours = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(self.tenant_id)
        .bind(name)
        .bind(address)
        .bind(opening_hours.map(Json))
        .fetch_optional(executor)
        .await?;
        tenant.ok_or(AppError::NotFound)
    }
}
