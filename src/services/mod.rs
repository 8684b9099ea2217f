pub mod auth;
pub mod booking_service;
pub mod inventory_service;
pub mod sale_service;
pub mod search_service;
pub mod tenancy_service;

pub use auth::AuthService;
pub use booking_service::BookingService;
pub use inventory_service::InventoryService;
pub use sale_service::SaleService;
pub use search_service::SearchService;
pub use tenancy_service::TenancyService;
