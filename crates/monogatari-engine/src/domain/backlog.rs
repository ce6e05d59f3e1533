//! Display history shown in the backlog screen.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Entries kept in memory.
pub const BACKLOG_CAPACITY: usize = 100;

/// One displayed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    /// Speaker name; empty for narration.
    #[serde(default)]
    pub speaker: String,
    /// Text body.
    pub text: String,
}

/// Bounded history of displayed lines, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backlog {
    entries: VecDeque<BacklogEntry>,
}

impl Backlog {
    /// Creates an empty backlog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, dropping the oldest once full.
    pub fn push(&mut self, speaker: &str, text: &str) {
        if self.entries.len() == BACKLOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(BacklogEntry {
            speaker: speaker.to_owned(),
            text: text.to_owned(),
        });
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been displayed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &BacklogEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&BacklogEntry> {
        self.entries.back()
    }

    /// The last `count` entries, oldest first.
    #[must_use]
    pub fn tail(&self, count: usize) -> Vec<BacklogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

impl FromIterator<BacklogEntry> for Backlog {
    fn from_iter<I: IntoIterator<Item = BacklogEntry>>(iter: I) -> Self {
        let mut backlog = Self::new();
        for entry in iter {
            backlog.push(&entry.speaker, &entry.text);
        }
        backlog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_entries_drop_at_capacity() {
        // Arrange
        let mut backlog = Backlog::new();

        // Act
        for i in 0..=BACKLOG_CAPACITY {
            backlog.push("", &format!("line {i}"));
        }

        // Assert
        assert_eq!(backlog.len(), BACKLOG_CAPACITY);
        assert_eq!(backlog.iter().next().unwrap().text, "line 1");
        assert_eq!(backlog.last().unwrap().text, format!("line {BACKLOG_CAPACITY}"));
    }

    #[test]
    fn test_tail_keeps_most_recent_in_order() {
        let mut backlog = Backlog::new();
        for i in 0..5 {
            backlog.push("イザナミ", &i.to_string());
        }

        let tail = backlog.tail(2);

        let texts: Vec<&str> = tail.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "4"]);
    }

    #[test]
    fn test_tail_longer_than_backlog_returns_everything() {
        let mut backlog = Backlog::new();
        backlog.push("", "only");

        assert_eq!(backlog.tail(20).len(), 1);
    }
}
