//! The fixed chapter sequence.
//!
//! Chapters are addressed by position in this table. Order matters: when a
//! chapter runs out of scenes, playback moves on to the next name here, and
//! running past the last one ends the story.

/// Chapter names in play order.
pub const CHAPTER_NAMES: [&str; 7] = [
    "prologue", "chapter1", "chapter2", "chapter3", "chapter4", "chapter5", "endings",
];

/// Display titles, parallel to [`CHAPTER_NAMES`].
pub const CHAPTER_TITLES: [&str; 7] = [
    "序章：運命の逃走",
    "第1章：高天原での出会い",
    "第2章：国生みの使命",
    "第3章：結婚と島産み",
    "第4章：幸せな日々と転機",
    "第5章：黄泉の国",
    "終章：それぞれの結末",
];

/// Returns the chapter name at `index`, or `None` past the end of the story.
#[must_use]
pub fn chapter_name(index: usize) -> Option<&'static str> {
    CHAPTER_NAMES.get(index).copied()
}

/// Returns the position of `name` in the chapter table.
#[must_use]
pub fn chapter_index(name: &str) -> Option<usize> {
    CHAPTER_NAMES.iter().position(|candidate| *candidate == name)
}

/// Returns the display title for the chapter at `index`.
#[must_use]
pub fn chapter_title(index: usize) -> Option<&'static str> {
    CHAPTER_TITLES.get(index).copied()
}
