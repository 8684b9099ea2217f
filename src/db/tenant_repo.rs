// src/db/tenant_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenancy::{Tenant, TenantStatus},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registration insert. New tenants always start PENDING; only an
    /// admin status flip makes them visible to the public surface.
    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
        email: &str,
        address: &str,
        license_number: &str,
        license_url: Option<&str>,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants
                (name, slug, email, address, license_number, license_url, lat, lng, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(email)
        .bind(address)
        .bind(license_number)
        .bind(license_url)
        .bind(lat)
        .bind(lng)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("slug") {
                        let mut errors = validator::ValidationErrors::new();
                        let mut err = validator::ValidationError::new("slug_taken");
                        err.message =
                            Some("A pharmacy with a similar name already exists".into());
                        errors.add("pharmacyName", err);
                        return AppError::ValidationError(errors);
                    }
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Admin-only status flip (approve / reject).
    pub async fn set_status(&self, tenant_id: Uuid, status: TenantStatus) -> Result<Tenant, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(tenant_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        tenant.ok_or(AppError::NotFound)
    }

    pub async fn list_by_status(&self, status: TenantStatus) -> Result<Vec<Tenant>, AppError> {
        let tenants = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE status = $1 ORDER BY created_at ASC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    /// Public pharmacy page lookup. Only ACTIVE tenants are reachable.
    pub async fn find_active_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE slug = $1 AND status = 'ACTIVE'",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }
}
