//! Round lifecycle: start, countdown, game over, and name entry.
//!
//! `GameSession` owns the clock and the leaderboard. Score and streak live in
//! `ScoreStreakModel`; the session reads them when the round ends.

use bevy::prelude::*;

use crate::config::DerbyConfig;
use crate::fishing::FishingSession;
use crate::save::{LeaderboardStorage, LeaderboardStore};
use crate::scoring::ScoreStreakModel;
use crate::shared::*;

mod leaderboard;
mod snapshot;

pub use leaderboard::*;
pub use snapshot::*;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSession>()
            .init_resource::<ScoreStreakModel>()
            .init_resource::<DerbySnapshot>()
            .add_event::<StartGameEvent>()
            .add_event::<SubmitScoreEvent>()
            .add_event::<GameOverEvent>()
            .add_systems(Startup, configure_session)
            .add_systems(
                Update,
                handle_start_game.run_if(in_state(GameState::MainMenu)),
            )
            .add_systems(
                Update,
                tick_session_clock
                    .after(crate::fishing::handle_reel_presses)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                handle_submit_score.run_if(in_state(GameState::NameEntry)),
            )
            .add_systems(
                PostUpdate,
                snapshot::publish_snapshot.after(crate::fishing::publish_fishing_notices),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    active: bool,
    time_remaining: f32,
    session_duration: f32,
    leaderboard: Leaderboard,
    name_entry_pending: bool,
    final_score: i64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(DerbyConfig::default().session_duration_secs)
    }
}

impl GameSession {
    pub fn new(session_duration: f32) -> Self {
        Self {
            active: false,
            time_remaining: 0.0,
            session_duration,
            leaderboard: Leaderboard::default(),
            name_entry_pending: false,
            final_score: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn session_duration(&self) -> f32 {
        self.session_duration
    }

    pub fn set_session_duration(&mut self, secs: f32) {
        self.session_duration = secs;
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn set_leaderboard(&mut self, leaderboard: Leaderboard) {
        self.leaderboard = leaderboard;
    }

    pub fn name_entry_pending(&self) -> bool {
        self.name_entry_pending
    }

    /// Score captured when the last round ended.
    pub fn final_score(&self) -> i64 {
        self.final_score
    }

    /// Begin a new round: fresh score, streak, and a full clock.
    pub fn start_game(&mut self, scoring: &mut ScoreStreakModel, fishing: &mut FishingSession) {
        scoring.reset();
        fishing.end(false);
        self.time_remaining = self.session_duration;
        self.name_entry_pending = false;
        self.final_score = 0;
        self.active = true;
        info!("Round started ({:.0}s)", self.session_duration);
    }

    /// Count the clock down. Returns true on the tick that ends the round.
    pub fn tick(
        &mut self,
        dt: f32,
        scoring: &ScoreStreakModel,
        fishing: &mut FishingSession,
    ) -> bool {
        if !self.active {
            return false;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            self.end_game(scoring, fishing);
            return true;
        }
        false
    }

    /// Add bonus seconds. Returns how many were added (0 when inactive).
    pub fn add_time(&mut self, seconds: f32) -> f32 {
        if !self.active {
            return 0.0;
        }
        self.time_remaining += seconds;
        seconds
    }

    /// Close the round. Aborts any fishing in progress and flags name entry
    /// if the score makes the board. Returns false if no round was running.
    pub fn end_game(&mut self, scoring: &ScoreStreakModel, fishing: &mut FishingSession) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        fishing.abort();
        self.final_score = scoring.score();
        self.name_entry_pending = self.leaderboard.qualifies(self.final_score);
        info!(
            "Round over: {} points (leaderboard: {})",
            self.final_score, self.name_entry_pending
        );
        true
    }

    /// Record the last round's score under `name`, then persist the board.
    ///
    /// The in-memory board is updated even if persisting fails; the error is
    /// returned for the caller to report. Returns the 0-based rank.
    pub fn save_score(
        &mut self,
        name: &str,
        date: &str,
        store: &dyn LeaderboardStore,
    ) -> Result<Option<usize>, String> {
        let entry = LeaderboardEntry::new(sanitize_name(name), self.final_score, date);
        let rank = self.leaderboard.insert(entry);
        self.name_entry_pending = false;
        store.persist(self.leaderboard.entries())?;
        Ok(rank)
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn configure_session(config: Res<DerbyConfig>, mut game: ResMut<GameSession>) {
    game.set_session_duration(config.session_duration_secs);
}

pub fn handle_start_game(
    mut start_events: EventReader<StartGameEvent>,
    mut game: ResMut<GameSession>,
    mut scoring: ResMut<ScoreStreakModel>,
    mut fishing: ResMut<FishingSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if start_events.read().last().is_none() {
        return;
    }
    game.start_game(&mut scoring, &mut fishing);
    next_state.set(GameState::Playing);
}

pub fn tick_session_clock(
    time: Res<Time>,
    mut game: ResMut<GameSession>,
    scoring: Res<ScoreStreakModel>,
    mut fishing: ResMut<FishingSession>,
    mut game_over_events: EventWriter<GameOverEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !game.tick(time.delta_secs(), &scoring, &mut fishing) {
        return;
    }
    let qualifies = game.name_entry_pending();
    game_over_events.send(GameOverEvent {
        final_score: game.final_score(),
        qualifies_for_leaderboard: qualifies,
    });
    next_state.set(if qualifies {
        GameState::NameEntry
    } else {
        GameState::MainMenu
    });
}

pub fn handle_submit_score(
    mut submit_events: EventReader<SubmitScoreEvent>,
    mut game: ResMut<GameSession>,
    storage: Res<LeaderboardStorage>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(event) = submit_events.read().last() else {
        return;
    };
    if !game.name_entry_pending() {
        return;
    }
    match game.save_score(&event.name, &today(), storage.store()) {
        Ok(Some(rank)) => info!("Saved score at rank {}", rank + 1),
        Ok(None) => info!("Score saved but did not place"),
        Err(e) => warn!("Leaderboard not persisted: {}", e),
    }
    next_state.set(GameState::MainMenu);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemoryStore;

    fn session() -> (GameSession, ScoreStreakModel, FishingSession) {
        (
            GameSession::new(60.0),
            ScoreStreakModel::default(),
            FishingSession::default(),
        )
    }

    #[test]
    fn test_start_game_resets_round_state() {
        let (mut game, mut scoring, mut fishing) = session();
        scoring.increment_streak();
        scoring.add_score(90);

        game.start_game(&mut scoring, &mut fishing);

        assert!(game.is_active());
        assert_eq!(game.time_remaining(), 60.0);
        assert_eq!(scoring.score(), 0);
        assert_eq!(scoring.streak(), 0);
        assert!((scoring.multiplier() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_counts_down_and_ends_at_zero() {
        let (mut game, mut scoring, mut fishing) = session();
        game.start_game(&mut scoring, &mut fishing);

        assert!(!game.tick(59.5, &scoring, &mut fishing));
        assert!(game.is_active());
        assert!(game.tick(1.0, &scoring, &mut fishing));
        assert!(!game.is_active());
        assert_eq!(game.time_remaining(), 0.0);
        assert!(!game.tick(1.0, &scoring, &mut fishing), "already over");
    }

    #[test]
    fn test_add_time_only_while_active() {
        let (mut game, mut scoring, mut fishing) = session();
        assert_eq!(game.add_time(5.0), 0.0);
        game.start_game(&mut scoring, &mut fishing);
        assert_eq!(game.add_time(5.0), 5.0);
        assert_eq!(game.time_remaining(), 65.0);
    }

    #[test]
    fn test_end_game_with_score_flags_name_entry_then_save() {
        let (mut game, mut scoring, mut fishing) = session();
        let store = MemoryStore::default();
        game.start_game(&mut scoring, &mut fishing);
        scoring.add_score(500);

        assert!(game.end_game(&scoring, &mut fishing));
        assert!(game.name_entry_pending());

        let rank = game.save_score("Ann", "2026-10-17", &store).unwrap();
        assert_eq!(rank, Some(0));
        assert!(!game.name_entry_pending());
        assert_eq!(
            game.leaderboard().entries(),
            &[LeaderboardEntry::new("Ann", 500, "2026-10-17")]
        );
        assert_eq!(store.snapshot(), game.leaderboard().entries());
    }

    #[test]
    fn test_end_game_with_zero_score_skips_name_entry() {
        let (mut game, mut scoring, mut fishing) = session();
        game.start_game(&mut scoring, &mut fishing);
        game.end_game(&scoring, &mut fishing);
        assert!(!game.name_entry_pending());
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let (mut game, mut scoring, mut fishing) = session();
        game.start_game(&mut scoring, &mut fishing);
        assert!(game.end_game(&scoring, &mut fishing));
        assert!(!game.end_game(&scoring, &mut fishing));
    }

    #[test]
    fn test_end_game_aborts_fishing() {
        let (mut game, mut scoring, mut fishing) = session();
        let mut rng = rand::thread_rng();
        game.start_game(&mut scoring, &mut fishing);
        assert!(fishing.cast(Vec2::ZERO, Vec2::new(0.0, 100.0), game.is_active(), &mut rng));

        game.end_game(&scoring, &mut fishing);

        assert!(fishing.is_idle());
        assert_eq!(fishing.cast_target(), None);
        assert_eq!(fishing.time_until_bite(), None);
        assert!(fishing.drain_notices().contains(&FishingNotice::Aborted));
    }

    #[test]
    fn test_save_score_reports_persist_failure_but_keeps_entry() {
        struct FailingStore;
        impl LeaderboardStore for FailingStore {
            fn load(&self) -> Result<Vec<LeaderboardEntry>, String> {
                Ok(Vec::new())
            }
            fn persist(&self, _entries: &[LeaderboardEntry]) -> Result<(), String> {
                Err("disk full".to_string())
            }
        }

        let (mut game, mut scoring, mut fishing) = session();
        game.start_game(&mut scoring, &mut fishing);
        scoring.add_score(10);
        game.end_game(&scoring, &mut fishing);

        let err = game.save_score("Bo", "2026-10-17", &FailingStore).unwrap_err();
        assert_eq!(err, "disk full");
        assert_eq!(game.leaderboard().len(), 1);
        assert!(!game.name_entry_pending());
    }
}
