//! Persistence domain types.

pub mod config;
pub mod save_record;
pub mod slot;
