// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};
use uuid::Uuid;

use crate::{
    db::{BookingRepository, MedicineRepository, TenantRepository, TenantScoped, UserRepository},
    services::{
        AuthService, BookingService, InventoryService, SaleService, SearchService, TenancyService,
    },
};

// The one explicitly constructed connection handle for the whole process,
// built at startup and injected everywhere through this state.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub sale_service: SaleService,
    pub booking_service: BookingService,
    pub search_service: SearchService,
    pub tenancy_service: TenancyService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("database connection established");

        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let medicine_repo = MedicineRepository::new(db_pool.clone());
        let booking_repo = BookingRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            tenant_repo.clone(),
            db_pool.clone(),
            jwt_secret,
        );
        let inventory_service = InventoryService::new(medicine_repo, db_pool.clone());
        let sale_service = SaleService::new(db_pool.clone());
        let booking_service = BookingService::new(booking_repo, db_pool.clone());
        let search_service = SearchService::new(db_pool.clone(), tenant_repo.clone());
        let tenancy_service = TenancyService::new(tenant_repo);

        Ok(Self {
            db_pool,
            auth_service,
            inventory_service,
            sale_service,
            booking_service,
            search_service,
            tenancy_service,
        })
    }

    /// Builds the tenant-scoped accessor for one authenticated owner.
    pub fn scoped(&self, tenant_id: Uuid) -> TenantScoped {
        TenantScoped::new(self.db_pool.clone(), tenant_id)
    }
}
