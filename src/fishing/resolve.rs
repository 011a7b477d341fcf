//! Catch resolution, miss penalties, and teardown.
//!
//! # Ordering
//! On a catch the streak is incremented *before* points are applied, so the
//! fish that extends the streak already earns the higher multiplier. The miss
//! penalty is applied after the streak resets and is never multiplied.
//!
//! # Mystery fish
//! A mystery fish rolls its real value when landed:
//!
//! | Field      | Range            |
//! |------------|------------------|
//! | basePoints | 10..=149         |
//! | timeBonus  | 5..=10 seconds   |

use bevy::prelude::*;
use rand::Rng;

use crate::scoring::ScoreStreakModel;
use crate::session::GameSession;
use crate::shared::*;
use super::minigame::SkillCheckOutcome;
use super::{FishingPhase, FishingSession};

pub const MYSTERY_POINTS_MIN: i64 = 10;
pub const MYSTERY_POINTS_MAX: i64 = 149;
pub const MYSTERY_TIME_MIN: u32 = 5;
pub const MYSTERY_TIME_MAX: u32 = 10;

impl FishingSession {
    /// Player pressed reel. Routes the skill-check outcome to the matching
    /// resolution path and returns it.
    pub fn reel(
        &mut self,
        scoring: &mut ScoreStreakModel,
        game: &mut GameSession,
        rng: &mut impl Rng,
    ) -> SkillCheckOutcome {
        if self.phase != FishingPhase::SkillCheck {
            return SkillCheckOutcome::Ignored;
        }

        let outcome = self.skill_check.check_hit();
        match outcome {
            SkillCheckOutcome::Success { score_multiplier } => {
                self.handle_catch_success(score_multiplier, scoring, game, rng);
            }
            SkillCheckOutcome::Miss => {
                self.handle_catch_fail(scoring);
            }
            SkillCheckOutcome::Hit { hits, required } => {
                self.notify(FishingNotice::HitRegistered { hits, required });
            }
            SkillCheckOutcome::Ignored => {}
        }
        outcome
    }

    /// Land the selected fish. Returns the applied report, or `None` if the
    /// session had no fish (it was torn down underneath the skill check).
    pub fn handle_catch_success(
        &mut self,
        score_multiplier: f64,
        scoring: &mut ScoreStreakModel,
        game: &mut GameSession,
        rng: &mut impl Rng,
    ) -> Option<CatchReport> {
        let Some(mut fish) = self.selected_fish.take() else {
            warn!("Catch resolved with no fish on the line; discarding");
            self.abort();
            return None;
        };
        self.phase = FishingPhase::Resolving;

        if fish.is_mystery {
            fish.base_points = rng.gen_range(MYSTERY_POINTS_MIN..=MYSTERY_POINTS_MAX);
            fish.time_bonus_secs = rng.gen_range(MYSTERY_TIME_MIN..=MYSTERY_TIME_MAX);
        }

        let streak_multiplier = scoring.increment_streak();
        let final_points = (fish.base_points as f64 * score_multiplier).floor() as i64;
        let points_awarded = scoring.add_score(final_points);
        let time_added = game.add_time(fish.time_bonus_secs as f32);

        let report = CatchReport {
            fish_id: fish.id.clone(),
            fish_name: fish.name.clone(),
            base_points: fish.base_points,
            accuracy: score_multiplier,
            points_awarded,
            time_added,
            streak: scoring.streak(),
            streak_multiplier,
            was_mystery: fish.is_mystery,
        };
        info!(
            "Caught {} for {} points (streak {})",
            report.fish_name, report.points_awarded, report.streak
        );
        self.notify(FishingNotice::Caught(report.clone()));
        self.end(true);
        Some(report)
    }

    /// Fish got away. Breaks the streak and removes the flat penalty.
    /// Returns the score delta applied.
    pub fn handle_catch_fail(&mut self, scoring: &mut ScoreStreakModel) -> i64 {
        scoring.record_miss();
        let applied = scoring.add_score(-self.miss_penalty);
        self.notify(FishingNotice::Missed { penalty: -applied });
        self.end(false);
        applied
    }

    /// Return to `Idle` from any phase, detaching the bite timer and the
    /// skill check so nothing from this run can fire later.
    pub fn end(&mut self, success: bool) {
        if let Some(id) = self.bite_task.take() {
            self.tasks.cancel(id);
        }
        self.skill_check.stop();
        self.cast_target = None;
        self.selected_fish = None;
        if self.phase != FishingPhase::Idle {
            debug!("Fishing run ended (success: {})", success);
        }
        self.phase = FishingPhase::Idle;
    }

    /// Forced teardown from outside the normal flow. Emits `Aborted` if a
    /// run was in progress. Returns whether anything was aborted.
    pub fn abort(&mut self) -> bool {
        let was_running = self.phase != FishingPhase::Idle;
        self.end(false);
        if was_running {
            self.notify(FishingNotice::Aborted);
        }
        was_running
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

pub fn handle_reel_presses(
    mut reel_events: EventReader<ReelPressEvent>,
    mut session: ResMut<FishingSession>,
    mut scoring: ResMut<ScoreStreakModel>,
    mut game: ResMut<GameSession>,
) {
    let mut rng = rand::thread_rng();
    for _ in reel_events.read() {
        session.reel(&mut scoring, &mut game, &mut rng);
    }
}

/// Escape pulls the line in without a penalty.
pub fn handle_cancel_requests(
    mut cancel_events: EventReader<CancelCastEvent>,
    mut session: ResMut<FishingSession>,
) {
    for _ in cancel_events.read() {
        if session.abort() {
            info!("Cast cancelled by player");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fishing::GOOD_MULTIPLIER;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn one_fish(id: &str, points: i64, difficulty: u32, time: u32, mystery: bool) -> FishRegistry {
        FishRegistry {
            fish: vec![FishType {
                id: id.into(),
                name: id.into(),
                base_points: points,
                catch_difficulty: difficulty,
                spawn_weight: 1.0,
                time_bonus_secs: time,
                is_mystery: mystery,
            }],
        }
    }

    struct Harness {
        fishing: FishingSession,
        scoring: ScoreStreakModel,
        game: GameSession,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            let mut h = Self {
                fishing: FishingSession::default(),
                scoring: ScoreStreakModel::default(),
                game: GameSession::new(60.0),
                rng: StdRng::seed_from_u64(7),
            };
            h.game.start_game(&mut h.scoring, &mut h.fishing);
            h
        }

        fn cast(&mut self) -> bool {
            let active = self.game.is_active();
            self.fishing
                .cast(Vec2::ZERO, Vec2::new(40.0, 120.0), active, &mut self.rng)
        }

        /// Cast and wait out the longest possible bite delay.
        fn hook(&mut self, registry: &FishRegistry) {
            assert!(self.cast());
            self.fishing.update(7.0, registry, &mut self.rng);
            assert_eq!(self.fishing.phase(), FishingPhase::SkillCheck);
        }

        fn reel_at_center(&mut self) -> SkillCheckOutcome {
            self.fishing.skill_check.set_marker(0.5);
            self.fishing
                .reel(&mut self.scoring, &mut self.game, &mut self.rng)
        }
    }

    #[test]
    fn test_second_cast_is_rejected() {
        let mut h = Harness::new();
        assert!(h.cast());
        assert_eq!(h.fishing.phase(), FishingPhase::WaitingForBite);
        let bite_in = h.fishing.time_until_bite();

        assert!(!h.cast());
        assert_eq!(h.fishing.phase(), FishingPhase::WaitingForBite);
        assert_eq!(h.fishing.time_until_bite(), bite_in);
    }

    #[test]
    fn test_cast_requires_running_round() {
        let mut fishing = FishingSession::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(!fishing.cast(Vec2::ZERO, Vec2::ONE, false, &mut rng));
        assert!(fishing.is_idle());
        assert!(fishing.drain_notices().is_empty());
    }

    #[test]
    fn test_bite_delay_within_configured_range() {
        for seed in 0..50 {
            let mut fishing = FishingSession::default();
            let mut rng = StdRng::seed_from_u64(seed);
            fishing.cast(Vec2::ZERO, Vec2::ONE, true, &mut rng);
            let delay = fishing.time_until_bite().unwrap();
            assert!((2.0..=7.0).contains(&delay), "delay {}", delay);
        }
    }

    #[test]
    fn test_bite_selects_fish_and_starts_skill_check() {
        let registry = one_fish("perch", 20, 2, 2, false);
        let mut h = Harness::new();
        h.hook(&registry);

        assert_eq!(h.fishing.selected_fish().map(|f| f.id.as_str()), Some("perch"));
        assert!(h.fishing.skill_check().is_active());
        assert_eq!(h.fishing.skill_check().params().required_hits, 2);
        assert_eq!(h.fishing.time_until_bite(), None);
    }

    #[test]
    fn test_bite_after_teardown_is_ignored() {
        let registry = one_fish("perch", 20, 2, 2, false);
        let mut h = Harness::new();
        assert!(h.cast());
        h.fishing.end(false);
        h.fishing.drain_notices();

        h.fishing.update(10.0, &registry, &mut h.rng);

        assert!(h.fishing.is_idle());
        assert!(!h.fishing.skill_check().is_active());
        assert!(h.fishing.drain_notices().is_empty());
    }

    #[test]
    fn test_recast_after_cancel_uses_fresh_timer() {
        let registry = one_fish("perch", 20, 2, 2, false);
        let mut h = Harness::new();
        assert!(h.cast());
        h.fishing.update(1.0, &registry, &mut h.rng);
        assert!(h.fishing.abort());
        assert!(h.cast());
        let bite_in = h.fishing.time_until_bite().unwrap();
        assert!(bite_in >= 2.0);

        // The cancelled bite must not land on the new cast.
        h.fishing.update(1.5, &registry, &mut h.rng);
        assert_eq!(h.fishing.phase(), FishingPhase::WaitingForBite);
    }

    #[test]
    fn test_reel_outside_skill_check_is_ignored() {
        let mut h = Harness::new();
        assert_eq!(h.reel_at_center(), SkillCheckOutcome::Ignored);
        assert!(h.cast());
        assert_eq!(h.reel_at_center(), SkillCheckOutcome::Ignored);
        assert_eq!(h.fishing.phase(), FishingPhase::WaitingForBite);
    }

    #[test]
    fn test_catch_increments_streak_before_scoring() {
        let registry = one_fish("perch", 20, 1, 2, false);
        let mut h = Harness::new();
        h.hook(&registry);

        let outcome = h.reel_at_center();

        assert_eq!(outcome, SkillCheckOutcome::Success { score_multiplier: 1.0 });
        // 20 * 1.0 accuracy, then x1.2 for the first streak step.
        assert_eq!(h.scoring.score(), 24);
        assert_eq!(h.scoring.streak(), 1);
        assert_eq!(h.game.time_remaining(), 62.0);
        assert!(h.fishing.is_idle());
        assert_eq!(h.fishing.cast_target(), None);
    }

    #[test]
    fn test_off_center_catch_uses_good_accuracy() {
        let registry = one_fish("bass", 35, 1, 0, false);
        let mut h = Harness::new();
        h.hook(&registry);

        let report = h
            .fishing
            .handle_catch_success(GOOD_MULTIPLIER, &mut h.scoring, &mut h.game, &mut h.rng)
            .unwrap();

        // floor(35 * 0.75) = 26, then floor(26 * 1.2) = 31.
        assert_eq!(report.points_awarded, 31);
        assert_eq!(h.scoring.score(), 31);
    }

    #[test]
    fn test_miss_penalty_is_not_multiplied() {
        let mut h = Harness::new();
        for _ in 0..5 {
            h.scoring.increment_streak();
        }
        h.scoring.add_score(50);
        assert_eq!(h.scoring.score(), 100);

        let applied = h.fishing.handle_catch_fail(&mut h.scoring);

        assert_eq!(applied, -20);
        assert_eq!(h.scoring.score(), 80);
        assert_eq!(h.scoring.streak(), 0);
        assert_eq!(h.scoring.misses(), 1);
        assert!(h
            .fishing
            .drain_notices()
            .contains(&FishingNotice::Missed { penalty: 20 }));
    }

    #[test]
    fn test_reel_outside_zone_misses() {
        let registry = one_fish("pike", 50, 4, 5, false);
        let mut h = Harness::new();
        h.hook(&registry);
        h.fishing.skill_check.set_marker(0.0);

        let outcome = h
            .fishing
            .reel(&mut h.scoring, &mut h.game, &mut h.rng);

        assert_eq!(outcome, SkillCheckOutcome::Miss);
        assert_eq!(h.scoring.score(), -20);
        assert!(h.fishing.is_idle());
    }

    #[test]
    fn test_mystery_rolls_real_values() {
        let registry = one_fish("mystery", 0, 1, 0, true);
        for seed in 0..20 {
            let mut h = Harness::new();
            h.rng = StdRng::seed_from_u64(seed);
            h.hook(&registry);
            h.reel_at_center();

            let report = h
                .fishing
                .drain_notices()
                .into_iter()
                .find_map(|n| match n {
                    FishingNotice::Caught(report) => Some(report),
                    _ => None,
                })
                .unwrap();
            assert!(report.was_mystery);
            assert!((MYSTERY_POINTS_MIN..=MYSTERY_POINTS_MAX).contains(&report.base_points));
            assert!((5.0..=10.0).contains(&report.time_added));
            assert_eq!(
                report.points_awarded,
                (report.base_points * 12).div_euclid(10)
            );
        }
    }

    #[test]
    fn test_catch_without_fish_aborts() {
        let mut h = Harness::new();
        h.fishing.phase = FishingPhase::SkillCheck;

        let report =
            h.fishing
                .handle_catch_success(1.0, &mut h.scoring, &mut h.game, &mut h.rng);

        assert!(report.is_none());
        assert!(h.fishing.is_idle());
        assert_eq!(h.scoring.score(), 0);
        assert_eq!(h.scoring.streak(), 0);
        assert_eq!(h.fishing.drain_notices(), vec![FishingNotice::Aborted]);
    }

    #[test]
    fn test_empty_catalog_aborts_the_cast() {
        let mut h = Harness::new();
        assert!(h.cast());
        h.fishing.update(7.0, &FishRegistry::default(), &mut h.rng);
        assert!(h.fishing.is_idle());
        assert_eq!(h.fishing.drain_notices().last(), Some(&FishingNotice::Aborted));
    }

    #[test]
    fn test_notices_arrive_in_order() {
        let registry = one_fish("perch", 20, 2, 2, false);
        let mut h = Harness::new();
        h.hook(&registry);
        h.reel_at_center();
        h.reel_at_center();

        let notices = h.fishing.drain_notices();
        assert_eq!(notices.len(), 4);
        assert_eq!(notices[0], FishingNotice::Cast { target: Vec2::new(40.0, 120.0) });
        assert_eq!(
            notices[1],
            FishingNotice::Bite {
                fish_name: "perch".into(),
                difficulty: 2
            }
        );
        assert_eq!(notices[2], FishingNotice::HitRegistered { hits: 1, required: 2 });
        assert!(matches!(notices[3], FishingNotice::Caught(_)));
        assert!(h.fishing.drain_notices().is_empty());
    }
}
