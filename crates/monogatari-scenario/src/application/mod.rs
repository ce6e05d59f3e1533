//! Scenario application services.

pub mod source;
pub mod store;
