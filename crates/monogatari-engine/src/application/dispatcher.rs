//! Line classification.
//!
//! Turns the line under the cursor into the transition the engine has to
//! make. Pure: the engine performs the side effects.

use monogatari_scenario::domain::effect::Effect;
use monogatari_scenario::domain::model::{CharacterPlacement, ChoiceOption, Line};

use crate::application::ports::PresentedOption;
use crate::domain::condition::is_satisfied;
use crate::domain::state::GameState;

/// What a line asks the engine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<'a> {
    /// Show text and wait for an advance. `speaker` is `None` for narration.
    Present {
        /// Speaker name.
        speaker: Option<&'a str>,
        /// Text body.
        text: &'a str,
        /// Sprite to show.
        character: Option<&'a CharacterPlacement>,
    },
    /// Show the visible options and wait for a pick.
    Choose {
        /// Prompt.
        prompt: Option<&'a str>,
        /// Visible options, never empty.
        options: Vec<PresentedOption>,
    },
    /// A choice whose every option is hidden.
    EmptyChoice,
    /// Fire an effect and move on.
    Effect(&'a Effect),
    /// Pause for `duration_ms`, then move on.
    Wait {
        /// Pause length.
        duration_ms: u64,
    },
    /// Jump to a scene or chapter by name.
    Jump {
        /// Scene id or chapter name.
        target: &'a str,
    },
    /// Move on without doing anything.
    Skip,
}

/// Classifies `line` against the current state.
#[must_use]
pub fn classify<'a>(line: &'a Line, state: &GameState) -> Transition<'a> {
    match line {
        Line::Narration { text } => Transition::Present {
            speaker: None,
            text,
            character: None,
        },
        Line::Dialogue {
            speaker,
            text,
            character,
        } => Transition::Present {
            speaker: Some(speaker),
            text,
            character: character.as_ref(),
        },
        Line::Choice { prompt, options } => {
            let options = visible_options(options, state);
            if options.is_empty() {
                Transition::EmptyChoice
            } else {
                Transition::Choose {
                    prompt: prompt.as_deref(),
                    options,
                }
            }
        }
        Line::Effect(effect) => Transition::Effect(effect),
        Line::Wait { duration_ms } => Transition::Wait {
            duration_ms: *duration_ms,
        },
        Line::SceneChange { target } => Transition::Jump { target },
        Line::Unknown => Transition::Skip,
    }
}

/// Filters `options` by their conditions, keeping authored order and each
/// option's original index.
#[must_use]
pub fn visible_options(options: &[ChoiceOption], state: &GameState) -> Vec<PresentedOption> {
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| is_satisfied(option.condition.as_ref(), state))
        .enumerate()
        .map(|(display_index, (original_index, option))| PresentedOption {
            display_index,
            original_index,
            text: option.text.clone(),
        })
        .collect()
}
