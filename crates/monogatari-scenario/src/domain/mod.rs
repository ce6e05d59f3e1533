//! Scenario domain types.

pub mod chapters;
pub mod condition;
pub mod document;
pub mod effect;
pub mod model;
