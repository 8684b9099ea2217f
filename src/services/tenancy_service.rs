// src/services/tenancy_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{TenantRepository, TenantScoped},
    models::tenancy::{Tenant, TenantStatus, UpdateSettingsPayload},
};

#[derive(Clone)]
pub struct TenancyService {
    tenant_repo: TenantRepository,
}

impl TenancyService {
    pub fn new(tenant_repo: TenantRepository) -> Self {
        Self { tenant_repo }
    }

    // Admin approval workflow: a plain status flip either way.

    pub async fn approve_pharmacy(&self, tenant_id: Uuid) -> Result<Tenant, AppError> {
        let tenant = self
            .tenant_repo
            .set_status(tenant_id, TenantStatus::Active)
            .await?;
        tracing::info!(tenant = %tenant.slug, "pharmacy approved");
        Ok(tenant)
    }

    pub async fn reject_pharmacy(&self, tenant_id: Uuid) -> Result<Tenant, AppError> {
        let tenant = self
            .tenant_repo
            .set_status(tenant_id, TenantStatus::Rejected)
            .await?;
        tracing::info!(tenant = %tenant.slug, "pharmacy rejected");
        Ok(tenant)
    }

    pub async fn list_pending(&self) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list_by_status(TenantStatus::Pending).await
    }

    /// Owner settings update, scoped to the caller's own tenant. Opening
    /// hours are validated here at the boundary; whatever shape is stored
    /// is taken at face value when read back.
    pub async fn update_settings(
        &self,
        scope: &TenantScoped,
        payload: &UpdateSettingsPayload,
    ) -> Result<Tenant, AppError> {
        if let Some(hours) = &payload.opening_hours {
            hours.validate().map_err(|e| {
                let mut errors = validator::ValidationErrors::new();
                errors.add("openingHours", e);
                AppError::ValidationError(errors)
            })?;
        }

        scope
            .update_tenant_settings(
                scope.pool(),
                &payload.name,
                &payload.address,
                payload.opening_hours.as_ref(),
            )
            .await
    }
}
