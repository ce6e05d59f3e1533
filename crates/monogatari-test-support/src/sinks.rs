//! Test sinks — record every presentation and effects call in order.

use std::sync::Mutex;

use monogatari_engine::application::ports::{EffectsSink, PresentationSink, PresentedOption};
use monogatari_engine::domain::ending::EndingId;
use monogatari_scenario::domain::effect::Effect;
use monogatari_scenario::domain::model::CharacterPlacement;

/// A call made on a [`PresentationSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    /// `show_narration`
    Narration(String),
    /// `show_dialogue`
    Dialogue {
        /// Speaker name.
        speaker: String,
        /// Text body.
        text: String,
        /// Sprite, if any.
        character: Option<CharacterPlacement>,
    },
    /// `show_choices`
    Choices {
        /// Prompt, if any.
        prompt: Option<String>,
        /// Visible options.
        options: Vec<PresentedOption>,
    },
    /// `show_ending`
    Ending(EndingId),
    /// `set_background`
    Background(String),
}

/// A presentation sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    calls: Mutex<Vec<PresentationCall>>,
}

impl RecordingPresentation {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<PresentationCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the text of every narration and dialogue call, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Narration(text) | PresentationCall::Dialogue { text, .. } => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Returns the most recent call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last(&self) -> Option<PresentationCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, call: PresentationCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PresentationSink for RecordingPresentation {
    fn show_narration(&self, text: &str) {
        self.record(PresentationCall::Narration(text.to_owned()));
    }

    fn show_dialogue(&self, speaker: &str, text: &str, character: Option<&CharacterPlacement>) {
        self.record(PresentationCall::Dialogue {
            speaker: speaker.to_owned(),
            text: text.to_owned(),
            character: character.cloned(),
        });
    }

    fn show_choices(&self, prompt: Option<&str>, options: &[PresentedOption]) {
        self.record(PresentationCall::Choices {
            prompt: prompt.map(str::to_owned),
            options: options.to_vec(),
        });
    }

    fn show_ending(&self, ending: EndingId) {
        self.record(PresentationCall::Ending(ending));
    }

    fn set_background(&self, background: &str) {
        self.record(PresentationCall::Background(background.to_owned()));
    }
}

/// A call made on an [`EffectsSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum EffectsCall {
    /// `play_effect`
    Effect(Effect),
    /// `play_bgm`
    Bgm(String),
}

/// An effects sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    calls: Mutex<Vec<EffectsCall>>,
}

impl RecordingEffects {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<EffectsCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl EffectsSink for RecordingEffects {
    fn play_effect(&self, effect: &Effect) {
        self.calls
            .lock()
            .unwrap()
            .push(EffectsCall::Effect(effect.clone()));
    }

    fn play_bgm(&self, track: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(EffectsCall::Bgm(track.to_owned()));
    }
}
