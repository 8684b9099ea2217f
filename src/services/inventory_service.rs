// src/services/inventory_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MedicineRepository, TenantScoped},
    models::{
        inventory::{
            AddInventoryPayload, Inventory, InventoryWithMedicine, StockMovement,
            StockMovementType, UpdateInventoryPayload,
        },
        sales::SaleWithItem,
    },
};

const RECENT_SALES: usize = 5;

// Dashboard card counters plus the most recent sales.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub inventory_count: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub sales_today_total: Decimal,
    pub recent_sales: Vec<SaleWithItem>,
}

/// INITIAL when the upsert created the row, RESTOCK when it incremented
/// an existing one; a zero increment on an existing row logs nothing.
fn initial_or_restock(inserted: bool, quantity: i32) -> Option<StockMovementType> {
    if inserted {
        Some(StockMovementType::Initial)
    } else if quantity > 0 {
        Some(StockMovementType::Restock)
    } else {
        None
    }
}

/// (total, low stock, out of stock). Low stock means a non-empty row
/// strictly below its own threshold.
fn count_stock_levels(items: &[InventoryWithMedicine]) -> (usize, usize, usize) {
    let mut low = 0;
    let mut out = 0;
    for item in items {
        if item.quantity == 0 {
            out += 1;
        } else if item.quantity < item.low_stock_threshold {
            low += 1;
        }
    }
    (items.len(), low, out)
}

#[derive(Clone)]
pub struct InventoryService {
    medicine_repo: MedicineRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(medicine_repo: MedicineRepository, pool: PgPool) -> Self {
        Self {
            medicine_repo,
            pool,
        }
    }

    pub async fn list_items(
        &self,
        scope: &TenantScoped,
    ) -> Result<Vec<InventoryWithMedicine>, AppError> {
        scope.list_inventory().await
    }

    pub async fn list_movements(&self, scope: &TenantScoped) -> Result<Vec<StockMovement>, AppError> {
        scope.list_movements().await
    }

    /// Add-stock flow: resolve the catalog entry, then upsert the
    /// (tenant, medicine) row and append the matching ledger entry in one
    /// transaction. Whether the entry is INITIAL or RESTOCK comes from
    /// the upsert itself, so two concurrent first-adds cannot both be
    /// tagged INITIAL.
    pub async fn add_stock(
        &self,
        scope: &TenantScoped,
        user_id: Uuid,
        payload: &AddInventoryPayload,
    ) -> Result<Inventory, AppError> {
        let medicine = self
            .medicine_repo
            .resolve_or_create(
                payload.medicine_name.trim(),
                payload.generic_name.as_deref(),
                payload.category.as_deref(),
                None,
            )
            .await?;

        let mut tx = self.pool.begin().await?;

        let (row, inserted) = scope
            .upsert_inventory(
                &mut *tx,
                medicine.id,
                payload.price,
                payload.quantity,
                payload.low_stock_threshold,
                payload.batch_number.as_deref(),
                payload.expiry_date,
            )
            .await?;

        if let Some(movement_type) = initial_or_restock(inserted, payload.quantity) {
            let reason = if inserted { Some("Initial stock") } else { None };
            scope
                .record_movement(
                    &mut *tx,
                    row.id,
                    Some(user_id),
                    movement_type,
                    payload.quantity,
                    reason,
                )
                .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Manual edit: absolute overwrite plus an ADJUSTMENT entry carrying
    /// the signed difference against the previous quantity. The old row
    /// is read under a row lock so a sale committing mid-edit cannot make
    /// the recorded delta disagree with the actual change.
    pub async fn update_item(
        &self,
        scope: &TenantScoped,
        user_id: Uuid,
        inventory_id: Uuid,
        payload: &UpdateInventoryPayload,
    ) -> Result<Inventory, AppError> {
        let mut tx = self.pool.begin().await?;

        let old = scope
            .find_inventory_for_update(&mut *tx, inventory_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let row = scope
            .set_inventory(
                &mut *tx,
                inventory_id,
                payload.price,
                payload.quantity,
                payload.low_stock_threshold,
                payload.batch_number.as_deref(),
                payload.expiry_date,
            )
            .await?;

        let delta = payload.quantity - old.quantity;
        if delta != 0 {
            scope
                .record_movement(
                    &mut *tx,
                    inventory_id,
                    Some(user_id),
                    StockMovementType::Adjustment,
                    delta,
                    Some("Manual stock edit"),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    pub async fn delete_item(
        &self,
        scope: &TenantScoped,
        inventory_id: Uuid,
    ) -> Result<(), AppError> {
        scope.delete_inventory(&self.pool, inventory_id).await
    }

    /// Dashboard overview: stock level counters, today's sales total and
    /// the most recent sales.
    pub async fn overview(&self, scope: &TenantScoped) -> Result<DashboardOverview, AppError> {
        let items = scope.list_inventory().await?;
        let (inventory_count, low_stock_count, out_of_stock_count) = count_stock_levels(&items);

        let sales_today_total = scope.sales_today_total().await?;
        let mut recent_sales = scope.list_sales().await?;
        recent_sales.truncate(RECENT_SALES);

        Ok(DashboardOverview {
            inventory_count,
            low_stock_count,
            out_of_stock_count,
            sales_today_total,
            recent_sales,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn created_row_logs_initial_even_at_zero() {
        assert_eq!(initial_or_restock(true, 0), Some(StockMovementType::Initial));
        assert_eq!(initial_or_restock(true, 5), Some(StockMovementType::Initial));
    }

    #[test]
    fn increment_on_existing_row_logs_restock() {
        assert_eq!(initial_or_restock(false, 5), Some(StockMovementType::Restock));
    }

    #[test]
    fn zero_increment_on_existing_row_logs_nothing() {
        assert_eq!(initial_or_restock(false, 0), None);
    }

    fn item(quantity: i32, low_stock_threshold: i32) -> InventoryWithMedicine {
        InventoryWithMedicine {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            medicine_id: Uuid::new_v4(),
            price: Decimal::new(1000, 2),
            quantity,
            low_stock_threshold,
            batch_number: None,
            expiry_date: None,
            medicine_name: "Panadol".into(),
            generic_name: None,
            category: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stock_levels_split_into_out_low_and_healthy() {
        let items = vec![item(0, 10), item(3, 10), item(10, 10), item(50, 10)];
        assert_eq!(count_stock_levels(&items), (4, 1, 1));
    }

    #[test]
    fn a_row_at_its_threshold_is_not_low_stock() {
        let items = vec![item(10, 10)];
        assert_eq!(count_stock_levels(&items), (1, 0, 0));
    }
}
