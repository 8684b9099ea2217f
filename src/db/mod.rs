pub mod booking_repo;
pub mod catalog_repo;
pub mod scoped;
pub mod tenant_repo;
pub mod user_repo;

pub use booking_repo::BookingRepository;
pub use catalog_repo::MedicineRepository;
pub use scoped::TenantScoped;
pub use tenant_repo::TenantRepository;
pub use user_repo::UserRepository;
