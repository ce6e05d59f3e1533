//! Visual and audio effect payloads carried by `effect` lines.
//!
//! The engine never interprets these; it hands them to the effects sink and
//! moves on. Defaults mirror what the renderer assumes when a field is left
//! out of the scenario data.

use serde::{Deserialize, Serialize};

const fn default_fade_ms() -> u64 {
    1000
}

fn default_flash_color() -> String {
    "#ffffff".to_owned()
}

const fn default_flash_ms() -> u64 {
    300
}

const fn default_shake_intensity() -> u32 {
    10
}

const fn default_shake_ms() -> u64 {
    500
}

const fn default_red_opacity() -> f64 {
    0.3
}

const fn default_blue_opacity() -> f64 {
    0.2
}

const fn default_glitch_ms() -> u64 {
    300
}

/// A single effect request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Fade the screen to black.
    Fadeout {
        /// Duration in milliseconds.
        #[serde(default = "default_fade_ms")]
        duration: u64,
    },
    /// Fade back in from black.
    Fadein {
        /// Duration in milliseconds.
        #[serde(default = "default_fade_ms")]
        duration: u64,
    },
    /// Full-screen colour flash.
    Flash {
        /// CSS colour.
        #[serde(default = "default_flash_color")]
        color: String,
        /// Duration in milliseconds.
        #[serde(default = "default_flash_ms")]
        duration: u64,
    },
    /// Screen shake.
    Shake {
        /// Displacement in pixels.
        #[serde(default = "default_shake_intensity")]
        intensity: u32,
        /// Duration in milliseconds.
        #[serde(default = "default_shake_ms")]
        duration: u64,
    },
    /// One-shot sound effect.
    Sound {
        /// Sound asset name.
        sound: String,
    },
    /// Red colour overlay.
    RedFilter {
        /// Overlay opacity.
        #[serde(default = "default_red_opacity")]
        opacity: f64,
    },
    /// Blue colour overlay.
    BlueFilter {
        /// Overlay opacity.
        #[serde(default = "default_blue_opacity")]
        opacity: f64,
    },
    /// The underworld atmosphere overlay.
    YomiEffect,
    /// Digital glitch distortion.
    Glitch {
        /// Duration in milliseconds.
        #[serde(default = "default_glitch_ms")]
        duration: u64,
    },
    /// Weather particles (`rain`, `snow`, `sakura`).
    Weather {
        /// Weather kind.
        weather: String,
    },
    /// Decorative particles.
    Particle {
        /// Particle kind.
        particle: String,
    },
    /// An effect type this build does not know. Forwarded and ignored.
    #[serde(other)]
    Unknown,
}

impl Effect {
    /// Returns the sound asset this effect plays, if any.
    #[must_use]
    pub fn sound(&self) -> Option<&str> {
        match self {
            Self::Sound { sound } => Some(sound),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let flash: Effect = serde_json::from_str(r#"{"type":"flash"}"#).unwrap();
        assert_eq!(
            flash,
            Effect::Flash {
                color: "#ffffff".to_owned(),
                duration: 300
            }
        );

        let shake: Effect = serde_json::from_str(r#"{"type":"shake","duration":800}"#).unwrap();
        assert_eq!(
            shake,
            Effect::Shake {
                intensity: 10,
                duration: 800
            }
        );
    }

    #[test]
    fn test_snake_case_tags() {
        let red: Effect = serde_json::from_str(r#"{"type":"red_filter"}"#).unwrap();
        assert_eq!(red, Effect::RedFilter { opacity: 0.3 });

        let yomi: Effect = serde_json::from_str(r#"{"type":"yomi_effect"}"#).unwrap();
        assert_eq!(yomi, Effect::YomiEffect);
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let effect: Effect = serde_json::from_str(r#"{"type":"fireworks","count":3}"#).unwrap();
        assert_eq!(effect, Effect::Unknown);
    }

    #[test]
    fn test_sound_accessor() {
        let effect = Effect::Sound {
            sound: "footsteps".to_owned(),
        };
        assert_eq!(effect.sound(), Some("footsteps"));
        assert_eq!(Effect::YomiEffect.sound(), None);
    }
}
