//! Player configuration.

use serde::{Deserialize, Serialize};

/// Storage key the configuration is kept under.
pub const CONFIG_KEY: &str = "gameConfig";

const SPEED_MIN: u32 = 1;
const SPEED_MAX: u32 = 100;

/// Text and audio preferences.
///
/// Fields missing from stored data take their defaults; values outside
/// their range are clamped by [`GameConfig::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Text reveal speed, 1 to 100.
    pub text_speed: u32,
    /// Auto-mode pacing, 1 to 100.
    pub auto_speed: u32,
    /// Music volume, 0.0 to 1.0.
    pub bgm_volume: f64,
    /// Sound effect volume, 0.0 to 1.0.
    pub se_volume: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            text_speed: 50,
            auto_speed: 50,
            bgm_volume: 0.7,
            se_volume: 0.7,
        }
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl GameConfig {
    /// Returns a copy with every field inside its range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            text_speed: self.text_speed.clamp(SPEED_MIN, SPEED_MAX),
            auto_speed: self.auto_speed.clamp(SPEED_MIN, SPEED_MAX),
            bgm_volume: clamp_volume(self.bgm_volume),
            se_volume: clamp_volume(self.se_volume),
        }
    }
}
