//! Chapter documents as authored, and their compilation into the runtime
//! tree.
//!
//! The document shape is `{ title?, scenes: [{ id, background?, bgm?, lines }] }`
//! with each line tagged by `type`. Compilation resolves option conditions
//! into [`Condition`]s once, at load time, so the engine never touches raw
//! expression strings.

use monogatari_core::error::EngineError;
use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::effect::Effect;
use super::model::{Chapter, CharacterPlacement, ChoiceOption, Line, OptionEffects, Scene};

const fn default_wait_ms() -> u64 {
    1000
}

/// A chapter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDocument {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Scenes in play order.
    pub scenes: Vec<SceneDocument>,
}

/// A scene as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Scene identifier.
    pub id: String,
    /// Background image name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Background music track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm: Option<String>,
    /// Lines in play order.
    #[serde(default)]
    pub lines: Vec<LineDocument>,
}

/// A line as authored, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineDocument {
    /// `{"type":"narration","text":…}`
    Narration {
        /// Text body.
        text: String,
    },
    /// `{"type":"dialogue","speaker":…,"text":…,"character":…}`
    Dialogue {
        /// Speaker name.
        speaker: String,
        /// Text body.
        text: String,
        /// Sprite placement.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        character: Option<CharacterPlacement>,
    },
    /// `{"type":"choice","text":…,"options":[…]}`
    Choice {
        /// Prompt.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Options in display order.
        options: Vec<OptionDocument>,
    },
    /// `{"type":"effect","effect":{…}}`
    Effect {
        /// The payload.
        effect: Effect,
    },
    /// `{"type":"wait","duration":…}`
    Wait {
        /// Milliseconds, 1000 when omitted.
        #[serde(default = "default_wait_ms")]
        duration: u64,
    },
    /// `{"type":"scene_change","next":…}`
    SceneChange {
        /// Scene id or chapter name.
        next: String,
    },
    /// Any other `type`.
    #[serde(other)]
    Unknown,
}

/// A choice option as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDocument {
    /// Button text.
    pub text: String,
    /// Condition expression, e.g. `affection >= 80` or `flags.promise_made`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// State changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectsDocument>,
    /// Jump target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Option effects as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectsDocument {
    /// Affection delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affection: Option<i32>,
    /// Trust delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust: Option<i32>,
    /// Flag to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Route to switch to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// A compiled chapter plus the recoverable problems found while compiling it.
#[derive(Debug, Clone)]
pub struct CompiledChapter {
    /// The runtime tree.
    pub chapter: Chapter,
    /// Recoverable problems, currently only malformed conditions.
    pub diagnostics: Vec<EngineError>,
}

impl ChapterDocument {
    /// Parses a JSON chapter document.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `input` is not a valid document.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Parses a YAML chapter document.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `input` is not a valid document.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    /// Compiles the document into the runtime tree for chapter `name`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ChapterLoad` if the document has no scenes.
    pub fn compile(self, name: &str) -> Result<CompiledChapter, EngineError> {
        if self.scenes.is_empty() {
            return Err(EngineError::ChapterLoad {
                chapter: name.to_owned(),
                reason: "document has no scenes".to_owned(),
            });
        }

        let mut diagnostics = Vec::new();
        let scenes = self
            .scenes
            .into_iter()
            .map(|scene| Scene {
                lines: scene
                    .lines
                    .into_iter()
                    .map(|line| compile_line(line, &mut diagnostics))
                    .collect(),
                id: scene.id,
                background: scene.background,
                bgm: scene.bgm,
            })
            .collect();

        Ok(CompiledChapter {
            chapter: Chapter {
                name: name.to_owned(),
                title: self.title,
                scenes,
                is_fallback: false,
            },
            diagnostics,
        })
    }
}

fn compile_line(line: LineDocument, diagnostics: &mut Vec<EngineError>) -> Line {
    match line {
        LineDocument::Narration { text } => Line::Narration { text },
        LineDocument::Dialogue {
            speaker,
            text,
            character,
        } => Line::Dialogue {
            speaker,
            text,
            character,
        },
        LineDocument::Choice { text, options } => Line::Choice {
            prompt: text,
            options: options
                .into_iter()
                .map(|option| compile_option(option, diagnostics))
                .collect(),
        },
        LineDocument::Effect { effect } => Line::Effect(effect),
        LineDocument::Wait { duration } => Line::Wait {
            duration_ms: duration,
        },
        LineDocument::SceneChange { next } => Line::SceneChange { target: next },
        LineDocument::Unknown => Line::Unknown,
    }
}

fn compile_option(option: OptionDocument, diagnostics: &mut Vec<EngineError>) -> ChoiceOption {
    let condition = option.condition.as_deref().map(Condition::parse);
    if let Some(Condition::Malformed(raw)) = &condition {
        diagnostics.push(EngineError::MalformedCondition(raw.clone()));
    }
    let effects = option.effects.unwrap_or_default();

    ChoiceOption {
        text: option.text,
        condition,
        effects: OptionEffects {
            affection_delta: effects.affection,
            trust_delta: effects.trust,
            flag_to_set: effects.flag,
            route: effects.route,
        },
        next: option.next,
    }
}
