//! HTTP route modules.

pub mod config;
pub mod game;
pub mod health;
pub mod saves;
