//! Playback position and its navigation rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The `(chapter, scene, line)` position of the single live session.
///
/// Only the navigation methods below move it; each one leaves the cursor on
/// the first line of whatever unit it moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackCursor {
    chapter: usize,
    scene: usize,
    line: usize,
}

impl PlaybackCursor {
    /// A cursor at an explicit position, used when restoring a save.
    #[must_use]
    pub const fn at(chapter: usize, scene: usize, line: usize) -> Self {
        Self {
            chapter,
            scene,
            line,
        }
    }

    /// Chapter index into the chapter table.
    #[must_use]
    pub const fn chapter(&self) -> usize {
        self.chapter
    }

    /// Scene index within the chapter.
    #[must_use]
    pub const fn scene(&self) -> usize {
        self.scene
    }

    /// Line index within the scene.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The read-tracking key for the current line.
    #[must_use]
    pub const fn coordinate(&self) -> LineCoordinate {
        LineCoordinate {
            chapter: self.chapter,
            scene: self.scene,
            line: self.line,
        }
    }

    /// Moves to the next line of the current scene.
    pub fn next_line(&mut self) {
        self.line += 1;
    }

    /// Moves to line 0 of the next scene.
    pub fn next_scene(&mut self) {
        self.scene += 1;
        self.line = 0;
    }

    /// Moves to scene 0, line 0 of the next chapter.
    pub fn next_chapter(&mut self) {
        self.chapter += 1;
        self.scene = 0;
        self.line = 0;
    }

    /// Moves to line 0 of scene `scene` in the current chapter.
    pub fn jump_to_scene(&mut self, scene: usize) {
        self.scene = scene;
        self.line = 0;
    }

    /// Moves to scene 0, line 0 of chapter `chapter`.
    pub fn jump_to_chapter(&mut self, chapter: usize) {
        self.chapter = chapter;
        self.scene = 0;
        self.line = 0;
    }
}

impl fmt::Display for PlaybackCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.coordinate(), f)
    }
}

/// A line address, rendered as `chapter-scene-line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LineCoordinate {
    /// Chapter index.
    pub chapter: usize,
    /// Scene index.
    pub scene: usize,
    /// Line index.
    pub line: usize,
}

impl fmt::Display for LineCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.chapter, self.scene, self.line)
    }
}

impl FromStr for LineCoordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-').map(str::parse::<usize>);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(chapter)), Some(Ok(scene)), Some(Ok(line)), None) => Ok(Self {
                chapter,
                scene,
                line,
            }),
            _ => Err(format!("invalid line coordinate '{s}'")),
        }
    }
}

impl From<LineCoordinate> for String {
    fn from(coordinate: LineCoordinate) -> Self {
        coordinate.to_string()
    }
}

impl TryFrom<String> for LineCoordinate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_scene_resets_line() {
        let mut cursor = PlaybackCursor::at(0, 0, 4);

        cursor.next_scene();

        assert_eq!(cursor, PlaybackCursor::at(0, 1, 0));
    }

    #[test]
    fn test_next_chapter_resets_scene_and_line() {
        let mut cursor = PlaybackCursor::at(2, 3, 4);

        cursor.next_chapter();

        assert_eq!(cursor, PlaybackCursor::at(3, 0, 0));
    }

    #[test]
    fn test_jumps_reset_lower_levels() {
        let mut cursor = PlaybackCursor::at(1, 2, 3);

        cursor.jump_to_scene(5);
        assert_eq!(cursor, PlaybackCursor::at(1, 5, 0));

        cursor.jump_to_chapter(4);
        assert_eq!(cursor, PlaybackCursor::at(4, 0, 0));
    }

    #[test]
    fn test_coordinate_string_form() {
        let coordinate = PlaybackCursor::at(1, 12, 3).coordinate();

        assert_eq!(coordinate.to_string(), "1-12-3");
        assert_eq!("1-12-3".parse::<LineCoordinate>(), Ok(coordinate));
    }

    #[test]
    fn test_coordinate_rejects_bad_strings() {
        assert!("1-2".parse::<LineCoordinate>().is_err());
        assert!("1-2-3-4".parse::<LineCoordinate>().is_err());
        assert!("a-b-c".parse::<LineCoordinate>().is_err());
    }

    #[test]
    fn test_coordinate_serializes_as_string() {
        let coordinate = LineCoordinate {
            chapter: 0,
            scene: 1,
            line: 2,
        };

        let json = serde_json::to_string(&coordinate).unwrap();

        assert_eq!(json, "\"0-1-2\"");
        assert_eq!(
            serde_json::from_str::<LineCoordinate>(&json).unwrap(),
            coordinate
        );
    }
}
