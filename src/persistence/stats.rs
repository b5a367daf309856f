//! Lifetime statistics and the top-10 leaderboard

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    pub kills: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties keep the older entry ahead
        let rank = match self.entries.iter().position(|e| entry.score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Repair a loaded board: sort and trim
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stats accumulated across every game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stats {
    pub high_score: u64,
    pub highest_wave: u32,
    /// Sum of every point ever scored
    pub total_score: u64,
    pub games_played: u32,
    pub enemies_killed: u64,
    pub leaderboard: Leaderboard,
}

impl Stats {
    pub fn add_score(&mut self, points: u64) {
        self.total_score = self.total_score.saturating_add(points);
    }

    /// Returns true when `score` is a new record
    pub fn update_high_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    pub fn add_enemies_killed(&mut self, count: u64) {
        self.enemies_killed = self.enemies_killed.saturating_add(count);
    }

    pub fn record_wave(&mut self, wave: u32) {
        self.highest_wave = self.highest_wave.max(wave);
    }

    /// A finished game: count it and offer it to the leaderboard
    pub fn record_game(&mut self, score: u64, wave: u32, kills: u64, timestamp: f64) -> Option<usize> {
        self.games_played += 1;
        self.record_wave(wave);
        self.leaderboard.add(HighScoreEntry {
            score,
            wave,
            kills,
            timestamp,
        })
    }
}
