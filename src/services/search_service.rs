// src/services/search_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantRepository,
    models::tenancy::{OpeningHours, Tenant},
};

#[derive(Clone)]
pub struct SearchService {
    pool: PgPool,
    tenant_repo: TenantRepository,
}

// ---
// Public result shapes. Exact stock counts are never exposed, only a
// coarse availability label derived from the low-stock threshold.
// ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSearchResult {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_range: PriceRange,
    pub pharmacies: Vec<PharmacyOffer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyOffer {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub address: String,
    pub price: Decimal,
    pub availability: &'static str,
    pub opening_hours: Option<OpeningHours>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyPage {
    pub pharmacy: Tenant,
    pub items: Vec<PharmacyPageItem>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyPageItem {
    pub inventory_id: Uuid,
    pub medicine_name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub availability: String,
}

#[derive(sqlx::FromRow)]
struct SearchRow {
    medicine_id: Uuid,
    medicine_name: String,
    generic_name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    tenant_id: Uuid,
    pharmacy_name: String,
    slug: String,
    address: String,
    opening_hours: Option<Json<OpeningHours>>,
    lat: Option<f64>,
    lng: Option<f64>,
    price: Decimal,
    quantity: i32,
    low_stock_threshold: i32,
}

pub fn availability_label(quantity: i32, low_stock_threshold: i32) -> &'static str {
    if quantity > low_stock_threshold {
        "In Stock"
    } else {
        "Limited Stock"
    }
}

impl SearchService {
    pub fn new(pool: PgPool, tenant_repo: TenantRepository) -> Self {
        Self { pool, tenant_repo }
    }

    /// Cross-tenant marketplace search: ACTIVE pharmacies and in-stock
    /// rows only, matched on brand or generic name, grouped per medicine
    /// with offers sorted by ascending price.
    pub async fn search_medicines(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<MedicineSearchResult>, AppError> {
        let query = query.trim();
        if query.len() < 2 {
            return Ok(Vec::new());
        }

        let pattern = format!("%{query}%");
        let rows = sqlx::query_as::<_, SearchRow>(
            r#"
            SELECT m.id AS medicine_id, m.name AS medicine_name, m.generic_name,
                   m.description, m.image_url,
                   t.id AS tenant_id, t.name AS pharmacy_name, t.slug, t.address,
                   t.opening_hours, t.lat, t.lng,
                   i.price, i.quantity, i.low_stock_threshold
            FROM medicines m
            JOIN inventory i ON i.medicine_id = m.id
            JOIN tenants t ON t.id = i.tenant_id
            WHERE t.status = 'ACTIVE'
              AND i.quantity > 0
              AND (m.name ILIKE $1 OR m.generic_name ILIKE $1)
              AND ($2::text IS NULL OR m.category = $2)
            ORDER BY m.name ASC, i.price ASC
            "#,
        )
        .bind(&pattern)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_results(rows))
    }

    /// Public pharmacy page: the ACTIVE tenant plus its in-stock items.
    pub async fn pharmacy_by_slug(&self, slug: &str) -> Result<PharmacyPage, AppError> {
        let pharmacy = self
            .tenant_repo
            .find_active_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)?;

        let items = sqlx::query_as::<_, PharmacyPageItem>(
            r#"
            SELECT i.id AS inventory_id, m.name AS medicine_name, m.generic_name,
                   m.category, i.price,
                   CASE WHEN i.quantity > i.low_stock_threshold
                        THEN 'In Stock' ELSE 'Limited Stock' END AS availability
            FROM inventory i
            JOIN medicines m ON m.id = i.medicine_id
            WHERE i.tenant_id = $1 AND i.quantity > 0
            ORDER BY m.name ASC
            "#,
        )
        .bind(pharmacy.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(PharmacyPage { pharmacy, items })
    }
}

// Rows arrive sorted by medicine then price, so grouping is a single
// pass appending to the last result.
fn group_results(rows: Vec<SearchRow>) -> Vec<MedicineSearchResult> {
    let mut results: Vec<MedicineSearchResult> = Vec::new();

    for row in rows {
        let offer = PharmacyOffer {
            id: row.tenant_id,
            name: row.pharmacy_name,
            slug: row.slug,
            address: row.address,
            price: row.price,
            availability: availability_label(row.quantity, row.low_stock_threshold),
            opening_hours: row.opening_hours.map(|json| json.0),
            lat: row.lat,
            lng: row.lng,
        };

        match results.last_mut() {
            Some(last) if last.id == row.medicine_id => {
                last.price_range.min = last.price_range.min.min(offer.price);
                last.price_range.max = last.price_range.max.max(offer.price);
                last.price_range.count += 1;
                last.pharmacies.push(offer);
            }
            _ => {
                results.push(MedicineSearchResult {
                    id: row.medicine_id,
                    name: row.medicine_name,
                    generic_name: row.generic_name,
                    description: row.description,
                    image_url: row.image_url,
                    price_range: PriceRange {
                        min: offer.price,
                        max: offer.price,
                        count: 1,
                    },
                    pharmacies: vec![offer],
                });
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(medicine: Uuid, pharmacy: &str, price: i64, qty: i32, threshold: i32) -> SearchRow {
        SearchRow {
            medicine_id: medicine,
            medicine_name: "Panadol".into(),
            generic_name: Some("Paracetamol".into()),
            description: None,
            image_url: None,
            tenant_id: Uuid::new_v4(),
            pharmacy_name: pharmacy.into(),
            slug: pharmacy.to_lowercase(),
            address: "1 Main St".into(),
            opening_hours: None,
            lat: None,
            lng: None,
            price: Decimal::new(price, 2),
            quantity: qty,
            low_stock_threshold: threshold,
        }
    }

    #[test]
    fn groups_offers_under_one_medicine_with_price_range() {
        let medicine = Uuid::new_v4();
        let rows = vec![
            row(medicine, "Alpha", 900, 50, 10),
            row(medicine, "Beta", 1200, 5, 10),
        ];

        let results = group_results(rows);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.price_range.min, Decimal::new(900, 2));
        assert_eq!(result.price_range.max, Decimal::new(1200, 2));
        assert_eq!(result.price_range.count, 2);
        assert_eq!(result.pharmacies[0].availability, "In Stock");
        assert_eq!(result.pharmacies[1].availability, "Limited Stock");
    }

    #[test]
    fn distinct_medicines_stay_separate() {
        let rows = vec![
            row(Uuid::new_v4(), "Alpha", 900, 50, 10),
            row(Uuid::new_v4(), "Beta", 1200, 5, 10),
        ];
        assert_eq!(group_results(rows).len(), 2);
    }

    #[test]
    fn availability_is_limited_at_the_threshold() {
        assert_eq!(availability_label(10, 10), "Limited Stock");
        assert_eq!(availability_label(11, 10), "In Stock");
    }
}
