//! Presentation frames — the engine's sink calls, buffered for the client.
//!
//! The engine never waits on its sinks, so the host collects every call in
//! order and hands the batch back with the response to the command that
//! caused it. Frames emitted by a timer firing between requests are parked
//! in a separate queue that only `GET /frames` serves, so they never show
//! up in some later command's response.

use std::sync::{Mutex, MutexGuard, PoisonError};

use monogatari_engine::application::ports::{EffectsSink, PresentationSink, PresentedOption};
use monogatari_engine::domain::ending::EndingId;
use monogatari_scenario::domain::effect::Effect;
use monogatari_scenario::domain::model::CharacterPlacement;
use serde::Serialize;

/// One thing for the browser to render or play.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    /// Unattributed text.
    Narration {
        /// Text body.
        text: String,
    },
    /// Spoken text.
    Dialogue {
        /// Speaker name.
        speaker: String,
        /// Text body.
        text: String,
        /// Sprite placement, if the line has one.
        #[serde(skip_serializing_if = "Option::is_none")]
        character: Option<CharacterPlacement>,
        /// Sprite key in `name_expression` form.
        #[serde(skip_serializing_if = "Option::is_none")]
        sprite: Option<String>,
    },
    /// Choice buttons.
    Choices {
        /// Question shown above the buttons.
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
        /// Visible options, in display order.
        options: Vec<PresentedOption>,
    },
    /// Ending screen.
    Ending {
        /// Which ending.
        ending: EndingId,
    },
    /// Background image change.
    Background {
        /// Image name.
        image: String,
    },
    /// Visual or sound effect.
    Effect {
        /// The effect request.
        effect: Effect,
    },
    /// Background music change.
    Bgm {
        /// Track name.
        track: String,
    },
}

/// Collects frames from both engine ports.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frames: Mutex<Vec<Frame>>,
    parked: Mutex<Vec<Frame>>,
}

fn lock(frames: &Mutex<Vec<Frame>>) -> MutexGuard<'_, Vec<Frame>> {
    frames.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FrameBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, frame: Frame) {
        lock(&self.frames).push(frame);
    }

    /// Takes every frame emitted by the command in progress, oldest first.
    pub fn drain(&self) -> Vec<Frame> {
        std::mem::take(&mut *lock(&self.frames))
    }

    /// Moves the frames emitted so far to the parked queue. Called after a
    /// timer resumes playback outside any request.
    pub fn park(&self) {
        let emitted = self.drain();
        lock(&self.parked).extend(emitted);
    }

    /// Takes every parked frame, oldest first.
    pub fn drain_parked(&self) -> Vec<Frame> {
        std::mem::take(&mut *lock(&self.parked))
    }

    /// Drops parked frames left over from a session that was replaced.
    pub fn discard_parked(&self) {
        lock(&self.parked).clear();
    }
}

impl PresentationSink for FrameBuffer {
    fn show_narration(&self, text: &str) {
        self.push(Frame::Narration {
            text: text.to_owned(),
        });
    }

    fn show_dialogue(&self, speaker: &str, text: &str, character: Option<&CharacterPlacement>) {
        self.push(Frame::Dialogue {
            speaker: speaker.to_owned(),
            text: text.to_owned(),
            character: character.cloned(),
            sprite: character.map(CharacterPlacement::sprite),
        });
    }

    fn show_choices(&self, prompt: Option<&str>, options: &[PresentedOption]) {
        self.push(Frame::Choices {
            prompt: prompt.map(str::to_owned),
            options: options.to_vec(),
        });
    }

    fn show_ending(&self, ending: EndingId) {
        self.push(Frame::Ending { ending });
    }

    fn set_background(&self, background: &str) {
        self.push(Frame::Background {
            image: background.to_owned(),
        });
    }
}

impl EffectsSink for FrameBuffer {
    fn play_effect(&self, effect: &Effect) {
        self.push(Frame::Effect {
            effect: effect.clone(),
        });
    }

    fn play_bgm(&self, track: &str) {
        self.push(Frame::Bgm {
            track: track.to_owned(),
        });
    }
}
