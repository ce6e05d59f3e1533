//! Immutable chapter/scene/line tree the engine walks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::chapters::{chapter_index, chapter_title};
use super::condition::Condition;
use super::effect::Effect;

/// Stage slot a character sprite is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagePosition {
    /// Left third of the stage.
    Left,
    /// Centre of the stage.
    #[default]
    Center,
    /// Right third of the stage.
    Right,
}

/// Which sprite to show alongside a dialogue line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPlacement {
    /// Character asset name; `none` or empty clears the slot.
    pub name: String,
    /// Expression variant, `normal` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Stage slot.
    #[serde(default)]
    pub position: StagePosition,
}

impl CharacterPlacement {
    /// Sprite key in `name_expression` form.
    #[must_use]
    pub fn sprite(&self) -> String {
        format!(
            "{}_{}",
            self.name,
            self.expression.as_deref().unwrap_or("normal")
        )
    }

    /// True if this placement clears its slot instead of drawing a sprite.
    #[must_use]
    pub fn clears_slot(&self) -> bool {
        self.name.is_empty() || self.name == "none"
    }
}

/// State changes attached to a choice option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionEffects {
    /// Added to affection, then clamped.
    pub affection_delta: Option<i32>,
    /// Added to trust, then clamped.
    pub trust_delta: Option<i32>,
    /// Flag set to true.
    pub flag_to_set: Option<String>,
    /// New route label.
    pub route: Option<String>,
}

impl OptionEffects {
    /// True if applying these effects changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.affection_delta.is_none()
            && self.trust_delta.is_none()
            && self.flag_to_set.is_none()
            && self.route.is_none()
    }
}

/// One branch of a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Button text.
    pub text: String,
    /// Visibility condition; `None` means always shown.
    pub condition: Option<Condition>,
    /// State changes applied when picked.
    pub effects: OptionEffects,
    /// Jump target; `None` falls through to the next line.
    pub next: Option<String>,
}

/// A single scripted instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Unattributed text.
    Narration {
        /// Text body.
        text: String,
    },
    /// Spoken text.
    Dialogue {
        /// Speaker name shown in the name plate.
        speaker: String,
        /// Text body.
        text: String,
        /// Sprite to show.
        character: Option<CharacterPlacement>,
    },
    /// A branching prompt.
    Choice {
        /// Prompt shown above the buttons.
        prompt: Option<String>,
        /// Options in authored order.
        options: Vec<ChoiceOption>,
    },
    /// Fire-and-forget presentation effect.
    Effect(Effect),
    /// Timed pause.
    Wait {
        /// Pause length in milliseconds.
        duration_ms: u64,
    },
    /// Immediate jump to a scene or chapter.
    SceneChange {
        /// Scene id or chapter name.
        target: String,
    },
    /// A line type this build does not understand.
    Unknown,
}

impl Line {
    /// Short name of the line kind, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Narration { .. } => "narration",
            Self::Dialogue { .. } => "dialogue",
            Self::Choice { .. } => "choice",
            Self::Effect(_) => "effect",
            Self::Wait { .. } => "wait",
            Self::SceneChange { .. } => "scene_change",
            Self::Unknown => "unknown",
        }
    }
}

/// An ordered run of lines with its own backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Identifier, unique within the chapter.
    pub id: String,
    /// Background image name.
    pub background: Option<String>,
    /// Background music track.
    pub bgm: Option<String>,
    /// Lines in play order.
    pub lines: Vec<Line>,
}

/// A loaded chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Chapter name from the chapter table.
    pub name: String,
    /// Display title, if the document carries one.
    pub title: Option<String>,
    /// Scenes in play order.
    pub scenes: Vec<Scene>,
    /// True if this chapter was substituted because the real one failed to load.
    pub is_fallback: bool,
}

impl Chapter {
    /// Builds the minimal stand-in used when a chapter cannot be loaded:
    /// one scene holding one narration line with the chapter title.
    #[must_use]
    pub fn fallback(name: &str) -> Self {
        let title = chapter_index(name)
            .and_then(chapter_title)
            .unwrap_or(name)
            .to_owned();
        Self {
            name: name.to_owned(),
            title: Some(title.clone()),
            scenes: vec![Scene {
                id: format!("{name}-fallback"),
                background: None,
                bgm: None,
                lines: vec![Line::Narration { text: title }],
            }],
            is_fallback: true,
        }
    }

    /// Returns the scene at `index`.
    #[must_use]
    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Returns the line at `(scene, line)`.
    #[must_use]
    pub fn line(&self, scene: usize, line: usize) -> Option<&Line> {
        self.scenes.get(scene)?.lines.get(line)
    }

    /// Returns the index of the scene whose id is `scene_id`.
    #[must_use]
    pub fn find_scene_index(&self, scene_id: &str) -> Option<usize> {
        self.scenes.iter().position(|scene| scene.id == scene_id)
    }

    /// Collects every asset this chapter references so a host can preload
    /// them before playback reaches them.
    #[must_use]
    pub fn asset_manifest(&self) -> AssetManifest {
        let mut manifest = AssetManifest::default();
        for scene in &self.scenes {
            if let Some(background) = &scene.background {
                manifest.backgrounds.insert(background.clone());
            }
            if let Some(bgm) = &scene.bgm {
                manifest.bgm.insert(bgm.clone());
            }
            for line in &scene.lines {
                match line {
                    Line::Dialogue {
                        character: Some(character),
                        ..
                    } if !character.clears_slot() => {
                        manifest.characters.insert(character.sprite());
                    }
                    Line::Effect(effect) => {
                        if let Some(sound) = effect.sound() {
                            manifest.sounds.insert(sound.to_owned());
                        }
                    }
                    _ => {}
                }
            }
        }
        manifest
    }
}

/// Distinct assets referenced by a chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetManifest {
    /// Background image names.
    pub backgrounds: BTreeSet<String>,
    /// Character sprites in `name_expression` form.
    pub characters: BTreeSet<String>,
    /// Sound effect names.
    pub sounds: BTreeSet<String>,
    /// Background music tracks.
    pub bgm: BTreeSet<String>,
}
