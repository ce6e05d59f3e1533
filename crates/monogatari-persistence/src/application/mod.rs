//! Persistence application services.

pub mod config_store;
pub mod slots;
