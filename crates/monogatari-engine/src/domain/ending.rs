//! Ending resolution.
//!
//! The guards overlap, so they are tried in a fixed order and the first one
//! that matches decides the ending.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// The endings the story can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingId {
    /// High affection after calling Kukurihime.
    SecretEnd,
    /// High affection after waiting in Yomi.
    TrueEnd,
    /// Avoided the fire god.
    FalseHappyEnd,
    /// Affection collapsed.
    BadEnd1,
    /// Everything else.
    NormalEnd,
}

impl EndingId {
    /// Wire name, e.g. `secret_end`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SecretEnd => "secret_end",
            Self::TrueEnd => "true_end",
            Self::FalseHappyEnd => "false_happy_end",
            Self::BadEnd1 => "bad_end1",
            Self::NormalEnd => "normal_end",
        }
    }
}

impl fmt::Display for EndingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the ending for a finished playthrough.
#[must_use]
pub fn resolve(state: &GameState) -> EndingId {
    let affection = state.affection();

    if affection >= 80 && state.flag("called_kukurihime") {
        EndingId::SecretEnd
    } else if affection >= 70 && state.flag("waited_at_yomi") {
        EndingId::TrueEnd
    } else if state.flag("avoided_fire_god") {
        EndingId::FalseHappyEnd
    } else if affection < 30 {
        EndingId::BadEnd1
    } else {
        EndingId::NormalEnd
    }
}
