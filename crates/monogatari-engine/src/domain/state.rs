//! Persistent game state and the mutations a choice can make to it.

use std::collections::{BTreeMap, BTreeSet};

use monogatari_scenario::domain::model::OptionEffects;
use serde::{Deserialize, Deserializer, Serialize};

use super::cursor::LineCoordinate;

/// Flags every new game starts with, all false.
pub const BASELINE_FLAGS: [&str; 6] = [
    "promise_made",
    "marriage_correct",
    "waited_at_yomi",
    "called_kukurihime",
    "avoided_fire_god",
    "positive_response",
];

/// Lower bound for affection and trust.
pub const STAT_MIN: i32 = 0;
/// Upper bound for affection and trust.
pub const STAT_MAX: i32 = 100;
/// Affection and trust at the start of a new game.
pub const INITIAL_STAT: i32 = 50;
/// Route label at the start of a new game.
pub const DEFAULT_ROUTE: &str = "main";

fn default_route() -> String {
    DEFAULT_ROUTE.to_owned()
}

fn clamp_stat(value: i64) -> i32 {
    i32::try_from(value.clamp(i64::from(STAT_MIN), i64::from(STAT_MAX))).unwrap_or(INITIAL_STAT)
}

fn deserialize_stat<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_stat)
}

/// One entry of the choice log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    /// Chapter index of the choice line.
    pub chapter: usize,
    /// Scene index of the choice line.
    pub scene: usize,
    /// Line index of the choice line.
    pub line: usize,
    /// Index of the picked option among all authored options.
    pub selected: usize,
    /// Text of the picked option.
    pub text: String,
}

/// Everything about a playthrough that survives a save/load.
///
/// Affection and trust stay within `[STAT_MIN, STAT_MAX]` at all times:
/// every write path clamps, including deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    flags: BTreeMap<String, bool>,
    #[serde(deserialize_with = "deserialize_stat")]
    affection: i32,
    #[serde(deserialize_with = "deserialize_stat")]
    trust: i32,
    #[serde(default = "default_route")]
    route: String,
    #[serde(rename = "choices", default)]
    choice_history: Vec<ChoiceRecord>,
    #[serde(rename = "readText", default)]
    read_lines: BTreeSet<LineCoordinate>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            flags: BASELINE_FLAGS
                .iter()
                .map(|name| ((*name).to_owned(), false))
                .collect(),
            affection: INITIAL_STAT,
            trust: INITIAL_STAT,
            route: default_route(),
            choice_history: Vec::new(),
            read_lines: BTreeSet::new(),
        }
    }
}

impl GameState {
    /// Fresh state for a new game.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current affection.
    #[must_use]
    pub fn affection(&self) -> i32 {
        self.affection
    }

    /// Current trust.
    #[must_use]
    pub fn trust(&self) -> i32 {
        self.trust
    }

    /// Current route label.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// All known flags.
    #[must_use]
    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    /// Value of flag `name`; unknown flags are false.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Every choice made so far, oldest first.
    #[must_use]
    pub fn choice_history(&self) -> &[ChoiceRecord] {
        &self.choice_history
    }

    /// Every line displayed at least once.
    #[must_use]
    pub fn read_lines(&self) -> &BTreeSet<LineCoordinate> {
        &self.read_lines
    }

    /// True if `coordinate` has been displayed before.
    #[must_use]
    pub fn is_read(&self, coordinate: LineCoordinate) -> bool {
        self.read_lines.contains(&coordinate)
    }

    /// Records `coordinate` as read. Returns true if it was not read before.
    pub fn mark_read(&mut self, coordinate: LineCoordinate) -> bool {
        self.read_lines.insert(coordinate)
    }

    /// Adds `delta` to affection, then clamps.
    pub fn adjust_affection(&mut self, delta: i32) {
        self.affection = clamp_stat(i64::from(self.affection) + i64::from(delta));
    }

    /// Adds `delta` to trust, then clamps.
    pub fn adjust_trust(&mut self, delta: i32) {
        self.trust = clamp_stat(i64::from(self.trust) + i64::from(delta));
    }

    /// Sets flag `name` to true. There is no way to clear a flag.
    pub fn set_flag(&mut self, name: &str) {
        self.flags.insert(name.to_owned(), true);
    }

    /// Replaces the route label.
    pub fn set_route(&mut self, route: &str) {
        route.clone_into(&mut self.route);
    }

    /// Applies an option's effects: stat deltas (add, then clamp), flag set,
    /// route overwrite.
    pub fn apply_effects(&mut self, effects: &OptionEffects) {
        if let Some(delta) = effects.affection_delta {
            self.adjust_affection(delta);
        }
        if let Some(delta) = effects.trust_delta {
            self.adjust_trust(delta);
        }
        if let Some(flag) = &effects.flag_to_set {
            self.set_flag(flag);
        }
        if let Some(route) = &effects.route {
            self.set_route(route);
        }
    }

    /// Logs `record` and applies `effects`, the full consequence of picking
    /// an option.
    pub fn apply_choice(&mut self, record: ChoiceRecord, effects: &OptionEffects) {
        self.choice_history.push(record);
        self.apply_effects(effects);
    }
}
