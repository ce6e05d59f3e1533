//! Monogatari — Persistence.
//!
//! Save records and their slots, player configuration, and the key-value
//! store adapters both are written through.

pub mod application;
pub mod domain;
pub mod file_store;
