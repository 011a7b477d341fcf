//! Top-ten leaderboard. Always sorted by score, highest first; ties keep the
//! earlier entry ahead.

use serde::{Deserialize, Serialize};

use crate::shared::{LEADERBOARD_CAPACITY, MAX_NAME_LEN};

pub const ANONYMOUS_NAME: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
    pub date: String,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: i64, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score,
            date: date.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Build from stored entries, restoring order and the size cap.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Would `score` earn a place on the board?
    pub fn qualifies(&self, score: i64) -> bool {
        if score <= 0 {
            return false;
        }
        match self.entries.get(LEADERBOARD_CAPACITY - 1) {
            Some(last) if self.entries.len() >= LEADERBOARD_CAPACITY => score > last.score,
            _ => true,
        }
    }

    /// Insert and re-rank. Returns the 0-based rank, or `None` if the entry
    /// fell off the bottom.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        self.entries.push(entry);
        let inserted = self.entries.len() - 1;
        // Stable sort keeps earlier entries ahead on ties; track ours by index.
        let mut indexed: Vec<(usize, LeaderboardEntry)> =
            std::mem::take(&mut self.entries).into_iter().enumerate().collect();
        indexed.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        let rank = indexed.iter().position(|(i, _)| *i == inserted);
        self.entries = indexed.into_iter().map(|(_, e)| e).collect();
        self.entries.truncate(LEADERBOARD_CAPACITY);
        rank.filter(|r| *r < LEADERBOARD_CAPACITY)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }
}

/// Trim, cap length, and substitute a placeholder for blank names.
pub fn sanitize_name(raw: &str) -> String {
    let trimmed: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        ANONYMOUS_NAME.to_string()
    } else {
        trimmed
    }
}
