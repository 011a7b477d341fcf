//! Score and streak model.
//!
//! The streak multiplier is `1 + 0.2 * min(streak, 5)`, so it tops out at
//! 2.0 after five consecutive catches. It is stored as integer tenths so that
//! `add_score` floors exactly instead of inheriting float drift.

use bevy::prelude::*;

/// Streak length at which the multiplier stops growing.
pub const MAX_STREAK_STEPS: u32 = 5;

/// Multiplier for a given streak, in tenths (10 = x1.0, 20 = x2.0).
pub fn multiplier_tenths(streak: u32) -> i64 {
    10 + 2 * streak.min(MAX_STREAK_STEPS) as i64
}

/// Multiplier for a given streak as a float, for display.
pub fn multiplier_for_streak(streak: u32) -> f64 {
    multiplier_tenths(streak) as f64 / 10.0
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ScoreStreakModel {
    score: i64,
    streak: u32,
    best_streak: u32,
    catches: u32,
    misses: u32,
}

impl ScoreStreakModel {
    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn multiplier(&self) -> f64 {
        multiplier_for_streak(self.streak)
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn catches(&self) -> u32 {
        self.catches
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Record a successful catch. Returns the new multiplier.
    pub fn increment_streak(&mut self) -> f64 {
        self.streak += 1;
        self.catches += 1;
        self.best_streak = self.best_streak.max(self.streak);
        self.multiplier()
    }

    /// Break the streak; the multiplier drops back to 1.0. Returns the
    /// length of the streak that was broken (0 if there was none).
    pub fn reset_streak(&mut self) -> u32 {
        let broken = std::mem::take(&mut self.streak);
        if broken > 0 {
            debug!("Streak of {} broken", broken);
        }
        broken
    }

    /// Record a failed catch. Breaks the streak.
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.reset_streak();
    }

    /// Apply `points` through the current multiplier and return the delta
    /// actually added. Negative values are floored toward negative infinity.
    pub fn add_score(&mut self, points: i64) -> i64 {
        let delta = (points * multiplier_tenths(self.streak)).div_euclid(10);
        self.score += delta;
        delta
    }

    /// Fresh round: zero score, streak and counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Format a score for display: "1,234 pts".
pub fn format_score(score: i64) -> String {
    let digits = score.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if score < 0 {
        format!("-{} pts", grouped)
    } else {
        format!("{} pts", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_formula_and_cap() {
        for streak in 0..=100u32 {
            let expected = 1.0 + 0.2 * streak.min(5) as f64;
            let actual = multiplier_for_streak(streak);
            assert!((actual - expected).abs() < 1e-9, "streak {}", streak);
            assert!(actual <= 2.0);
        }
    }

    #[test]
    fn test_three_increments_then_add_score() {
        let mut model = ScoreStreakModel::default();
        let seen: Vec<f64> = (0..3).map(|_| model.increment_streak()).collect();
        assert!((seen[0] - 1.2).abs() < 1e-9);
        assert!((seen[1] - 1.4).abs() < 1e-9);
        assert!((seen[2] - 1.6).abs() < 1e-9);

        let delta = model.add_score(100);
        assert_eq!(delta, 160);
        assert_eq!(model.score(), 160);
    }

    #[test]
    fn test_reset_streak_restores_unit_multiplier() {
        let mut model = ScoreStreakModel::default();
        for _ in 0..7 {
            model.increment_streak();
        }
        assert!((model.multiplier() - 2.0).abs() < 1e-9);
        model.reset_streak();
        assert_eq!(model.streak(), 0);
        assert!((model.multiplier() - 1.0).abs() < 1e-9);
        assert_eq!(model.best_streak(), 7);
    }

    #[test]
    fn test_only_a_live_streak_counts_as_broken() {
        let mut model = ScoreStreakModel::default();
        model.increment_streak();
        model.increment_streak();
        assert_eq!(model.reset_streak(), 2);
        // Catches are on record but there is no streak left to break.
        assert_eq!(model.reset_streak(), 0);
        model.record_miss();
        assert_eq!(model.misses(), 1);
        assert_eq!(model.streak(), 0);
    }

    #[test]
    fn test_add_score_floors_small_values_exactly() {
        let mut model = ScoreStreakModel::default();
        model.increment_streak();
        model.increment_streak();
        // 5 * 1.4 is exactly 7; float math would risk 6.
        assert_eq!(model.add_score(5), 7);
        // 3 * 1.4 = 4.2 -> 4
        assert_eq!(model.add_score(3), 4);
    }

    #[test]
    fn test_negative_points_floor_downward() {
        let mut model = ScoreStreakModel::default();
        model.increment_streak(); // x1.2
        // -5 * 1.2 = -6.0
        assert_eq!(model.add_score(-5), -6);
        // -3 * 1.2 = -3.6 -> -4
        assert_eq!(model.add_score(-3), -4);
        assert_eq!(model.score(), -10);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut model = ScoreStreakModel::default();
        model.increment_streak();
        model.add_score(50);
        model.record_miss();
        model.reset();
        assert_eq!(model, ScoreStreakModel::default());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0 pts");
        assert_eq!(format_score(160), "160 pts");
        assert_eq!(format_score(1234), "1,234 pts");
        assert_eq!(format_score(-20), "-20 pts");
        assert_eq!(format_score(1_000_000), "1,000,000 pts");
    }
}
