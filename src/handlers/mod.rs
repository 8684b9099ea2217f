pub mod admin;
pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod inventory;
pub mod sales;
pub mod search;
pub mod settings;
