//! Condition evaluation against the live game state.

use monogatari_scenario::domain::condition::{Condition, StatField};
use tracing::warn;

use super::state::GameState;

/// Evaluates a compiled condition. Malformed conditions are true.
#[must_use]
pub fn evaluate(condition: &Condition, state: &GameState) -> bool {
    match condition {
        Condition::Comparison { field, op, value } => {
            let lhs = match field {
                StatField::Affection => state.affection(),
            };
            op.holds(lhs, *value)
        }
        Condition::FlagTest { name } => state.flag(name),
        Condition::Malformed(raw) => {
            warn!(condition = %raw, "malformed condition evaluated as true");
            true
        }
    }
}

/// Parses and evaluates a raw expression in one step.
#[must_use]
pub fn evaluate_expression(expression: &str, state: &GameState) -> bool {
    evaluate(&Condition::parse(expression), state)
}

/// Evaluates an optional condition; an absent condition always holds.
#[must_use]
pub fn is_satisfied(condition: Option<&Condition>, state: &GameState) -> bool {
    condition.is_none_or(|condition| evaluate(condition, state))
}
