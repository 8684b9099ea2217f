// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::catalog::Medicine};

// The global medicine catalog. Tenant-independent on purpose: pharmacies
// share one row per medicine name, looked up case-insensitively.
#[derive(Clone)]
pub struct MedicineRepository {
    pool: PgPool,
}

impl MedicineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_name_ci<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<Medicine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let medicine = sqlx::query_as::<_, Medicine>(
            "SELECT * FROM medicines WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(executor)
        .await?;
        Ok(medicine)
    }

    /// Case-insensitive find-or-create. An existing row is returned
    /// unchanged, so a later caller with blank optional fields never
    /// wipes data the first caller provided. If two tenants race on the
    /// same new name, the loser of the unique index re-selects the
    /// winner's row instead of failing.
    pub async fn resolve_or_create(
        &self,
        name: &str,
        generic_name: Option<&str>,
        category: Option<&str>,
        description: Option<&str>,
    ) -> Result<Medicine, AppError> {
        if let Some(existing) = self.find_by_name_ci(&self.pool, name).await? {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, Medicine>(
            r#"
            INSERT INTO medicines (name, generic_name, category, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(generic_name)
        .bind(category)
        .bind(description)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(medicine) => Ok(medicine),
            Err(e) => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        // Lost the race: another tenant created it first.
                        if let Some(existing) = self.find_by_name_ci(&self.pool, name).await? {
                            return Ok(existing);
                        }
                    }
                }
                Err(e.into())
            }
        }
    }
}
