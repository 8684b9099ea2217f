pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod inventory;
pub mod sales;
pub mod tenancy;
