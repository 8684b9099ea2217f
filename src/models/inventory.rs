// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// Inventory (the per-tenant stock row)
// ---
// Exactly one row per (tenant_id, medicine_id); quantity is kept
// non-negative by the database CHECK and the conditional updates in
// `db::scoped`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub medicine_id: Uuid,
    pub price: Decimal,
    pub quantity: i32,
    pub low_stock_threshold: i32,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Joined row for the dashboard listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryWithMedicine {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub medicine_id: Uuid,
    pub price: Decimal,
    pub quantity: i32,
    pub low_stock_threshold: i32,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub medicine_name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Stock movements (append-only audit ledger)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_movement_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovementType {
    Initial,
    Restock,
    Sale,
    Adjustment,
    Cancellation,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub user_id: Option<Uuid>,
    pub movement_type: StockMovementType,
    pub quantity: i32, // signed delta: positive inbound, negative outbound
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

pub fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddInventoryPayload {
    #[validate(length(min = 2, message = "Medicine name is required"))]
    pub medicine_name: String,

    pub generic_name: Option<String>,
    pub category: Option<String>,

    #[validate(custom(function = "validate_non_negative_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, max = 1_000_000, message = "Quantity is out of range"))]
    pub quantity: i32,

    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,

    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

fn default_low_stock_threshold() -> i32 {
    10
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryPayload {
    #[validate(custom(function = "validate_non_negative_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, max = 1_000_000, message = "Quantity is out of range"))]
    pub quantity: i32,

    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub low_stock_threshold: i32,

    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_payload_rejects_negative_quantity() {
        let payload = AddInventoryPayload {
            medicine_name: "Panadol".into(),
            generic_name: None,
            category: None,
            price: Decimal::new(1050, 2),
            quantity: -1,
            low_stock_threshold: 10,
            batch_number: None,
            expiry_date: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn add_payload_rejects_negative_price_and_short_name() {
        let payload = AddInventoryPayload {
            medicine_name: "P".into(),
            generic_name: None,
            category: None,
            price: Decimal::new(-100, 2),
            quantity: 5,
            low_stock_threshold: 10,
            batch_number: None,
            expiry_date: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("medicineName")
            || errors.field_errors().contains_key("medicine_name"));
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn add_payload_rejects_oversized_quantity() {
        let payload = AddInventoryPayload {
            medicine_name: "Panadol".into(),
            generic_name: None,
            category: None,
            price: Decimal::new(1050, 2),
            quantity: 1_000_001,
            low_stock_threshold: 10,
            batch_number: None,
            expiry_date: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_payload_rejects_oversized_quantity() {
        let payload = UpdateInventoryPayload {
            price: Decimal::new(1050, 2),
            quantity: i32::MAX,
            low_stock_threshold: 10,
            batch_number: None,
            expiry_date: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn threshold_defaults_to_ten() {
        let payload: AddInventoryPayload = serde_json::from_value(serde_json::json!({
            "medicineName": "Panadol",
            "price": 10.5,
            "quantity": 3
        }))
        .unwrap();
        assert_eq!(payload.low_stock_threshold, 10);
        assert!(payload.validate().is_ok());
    }
}
