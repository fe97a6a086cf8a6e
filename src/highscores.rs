//! High score leaderboard
//!
//! Lives for the process only; tracks the top 10 finished runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the run
    pub score: i64,
    /// Whole seconds the run lasted
    pub elapsed_secs: u64,
    /// Reached the finish line
    pub won: bool,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: i64) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a finished run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: i64, elapsed_secs: u64, won: bool) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            elapsed_secs,
            won,
        };

        // Sorted descending; ties keep the earlier run first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
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

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Format whole seconds as `MM:SS`
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_negative_scores_do_not_qualify() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 10, false), None);
        assert_eq!(scores.add_score(-3, 10, false), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(300, 20, false), Some(1));
        assert_eq!(scores.add_score(500, 40, true), Some(1));
        assert_eq!(scores.add_score(400, 30, false), Some(2));
        assert_eq!(scores.add_score(300, 25, true), Some(4));

        let ordered: Vec<i64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![500, 400, 300, 300]);
        assert_eq!(scores.top_score(), Some(500));
        assert_eq!(scores.entries[2].elapsed_secs, 20);
    }

    #[test]
    fn test_capped_at_ten() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.add_score(i * 100, 0, false);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(300));
        assert!(!scores.qualifies(300));
        assert!(scores.qualifies(301));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(3_600), "60:00");
    }
}
