//! Monogatari Core — shared abstractions.
//!
//! This crate defines the traits and types that every other crate in the
//! engine depends on: time, the error taxonomy, the key-value storage port
//! and the error-reporting port. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod report;
pub mod storage;
