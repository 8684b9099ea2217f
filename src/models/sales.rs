// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::inventory::validate_non_negative_price;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// unit_price is a snapshot taken when the sale is logged; later price
// edits on the inventory row do not touch it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub inventory_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

// Joined row for the sales history listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithItem {
    pub id: Uuid,
    pub total_amount: Decimal,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub medicine_name: String,
    pub created_at: DateTime<Utc>,
}

/// The one place sale totals are computed.
pub fn sale_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogSalePayload {
    pub inventory_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    #[validate(custom(function = "validate_non_negative_price"))]
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_quantity_times_unit_price() {
        let total = sale_total(5, Decimal::new(1000, 2)); // 5 x 10.00
        assert_eq!(total, Decimal::new(5000, 2));
    }

    #[test]
    fn total_keeps_cents_exact() {
        // 3 x 3.33 = 9.99, no float drift
        let total = sale_total(3, Decimal::new(333, 2));
        assert_eq!(total, Decimal::new(999, 2));
    }

    #[test]
    fn payload_rejects_zero_quantity() {
        let payload = LogSalePayload {
            inventory_id: Uuid::new_v4(),
            quantity: 0,
            unit_price: Decimal::ONE,
        };
        assert!(payload.validate().is_err());
    }
}
