//! Monogatari — Scenario execution engine.
//!
//! Walks a chapter's scene/line tree one line at a time, suspending where
//! the player has to act, applying choice effects to the persistent game
//! state and resolving the ending once the chapter sequence runs out.

pub mod application;
pub mod domain;
