// src/services/sale_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantScoped,
    models::{
        inventory::StockMovementType,
        sales::{LogSalePayload, Sale, SaleWithItem, sale_total},
    },
};

#[derive(Clone)]
pub struct SaleService {
    pool: PgPool,
}

impl SaleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a sale as one atomic unit: scoped load, conditional stock
    /// decrement, Sale + SaleItem insert, SALE ledger entry. Either all
    /// of it commits or none of it does.
    pub async fn log_sale(
        &self,
        scope: &TenantScoped,
        caller_id: Uuid,
        payload: &LogSalePayload,
    ) -> Result<Sale, AppError> {
        let mut tx = self.pool.begin().await?;

        let inventory = scope
            .find_inventory(&mut *tx, payload.inventory_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Friendly precheck for the common case. The conditional update
        // below remains the source of truth under concurrency.
        if inventory.quantity < payload.quantity {
            return Err(AppError::InsufficientStock);
        }

        scope
            .decrement_atomic(&mut *tx, payload.inventory_id, payload.quantity)
            .await?;

        let total_amount = sale_total(payload.quantity, payload.unit_price);
        let sale = scope.create_sale(&mut *tx, total_amount).await?;
        scope
            .create_sale_item(
                &mut *tx,
                sale.id,
                payload.inventory_id,
                payload.quantity,
                payload.unit_price,
            )
            .await?;

        scope
            .record_movement(
                &mut *tx,
                payload.inventory_id,
                Some(caller_id),
                StockMovementType::Sale,
                -payload.quantity,
                None,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(sale = %sale.id, quantity = payload.quantity, "sale logged");
        Ok(sale)
    }

    pub async fn list_sales(&self, scope: &TenantScoped) -> Result<Vec<SaleWithItem>, AppError> {
        scope.list_sales().await
    }
}
