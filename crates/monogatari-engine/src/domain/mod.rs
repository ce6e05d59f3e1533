//! Engine domain types.

pub mod backlog;
pub mod condition;
pub mod cursor;
pub mod ending;
pub mod state;
