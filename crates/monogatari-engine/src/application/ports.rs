//! Ports the engine drives.
//!
//! Every call is fire-and-forget: the engine never waits on a sink and never
//! reads anything back. The host answers with `advance`, `choose` or
//! `resume_timer` on the engine itself.

use monogatari_scenario::domain::effect::Effect;
use monogatari_scenario::domain::model::CharacterPlacement;
use serde::{Deserialize, Serialize};

use crate::domain::ending::EndingId;

/// A choice option as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedOption {
    /// Position among the visible options; what `choose` takes.
    pub display_index: usize,
    /// Position among all authored options; what the choice log records.
    pub original_index: usize,
    /// Button text.
    pub text: String,
}

/// Text, choices, backgrounds and endings.
pub trait PresentationSink: Send + Sync {
    /// Shows an unattributed line.
    fn show_narration(&self, text: &str);

    /// Shows a spoken line with an optional sprite.
    fn show_dialogue(&self, speaker: &str, text: &str, character: Option<&CharacterPlacement>);

    /// Shows the visible options of a choice.
    fn show_choices(&self, prompt: Option<&str>, options: &[PresentedOption]);

    /// Shows the ending screen.
    fn show_ending(&self, ending: EndingId);

    /// Switches the background image on scene entry.
    fn set_background(&self, background: &str);
}

/// Visual effects and audio.
pub trait EffectsSink: Send + Sync {
    /// Plays a presentation effect.
    fn play_effect(&self, effect: &Effect);

    /// Starts a background music track on scene entry.
    fn play_bgm(&self, track: &str);
}
