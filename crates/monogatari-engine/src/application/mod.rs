//! Engine application services.

pub mod dispatcher;
pub mod engine;
pub mod ports;
