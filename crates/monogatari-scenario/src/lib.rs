//! Monogatari — Scenario context.
//!
//! Responsible for chapter documents: parsing them into immutable
//! chapter/scene/line trees, compiling choice conditions, fetching them from
//! a data source and caching them for the lifetime of the process.

pub mod application;
pub mod domain;
