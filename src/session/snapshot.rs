//! Read-only view of the game for the presentation layer, rebuilt every frame.

use bevy::prelude::*;

use crate::fishing::{FishingPhase, FishingSession};
use crate::scoring::ScoreStreakModel;
use crate::shared::*;
use super::GameSession;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DerbySnapshot {
    pub active: bool,
    pub score: i64,
    pub time_remaining: f32,
    pub streak: u32,
    pub multiplier: f64,
    pub phase: FishingPhase,
    pub cast_target: Option<Vec2>,
    pub skill_check_active: bool,
    pub marker_position: f32,
    pub zone_bounds: (f32, f32),
    pub hits: u32,
    pub required_hits: u32,
    pub last_catch: Option<CatchReport>,
    pub name_entry_pending: bool,
    pub final_score: i64,
}

impl DerbySnapshot {
    pub fn capture(
        game: &GameSession,
        scoring: &ScoreStreakModel,
        fishing: &FishingSession,
        last_catch: Option<CatchReport>,
    ) -> Self {
        let check = fishing.skill_check();
        Self {
            active: game.is_active(),
            score: scoring.score(),
            time_remaining: game.time_remaining(),
            streak: scoring.streak(),
            multiplier: scoring.multiplier(),
            phase: fishing.phase(),
            cast_target: fishing.cast_target(),
            skill_check_active: check.is_active(),
            marker_position: check.marker_position(),
            zone_bounds: check.zone_bounds(),
            hits: check.current_hits(),
            required_hits: check.params().required_hits,
            last_catch,
            name_entry_pending: game.name_entry_pending(),
            final_score: game.final_score(),
        }
    }
}

pub fn publish_snapshot(
    game: Res<GameSession>,
    scoring: Res<ScoreStreakModel>,
    fishing: Res<FishingSession>,
    mut notices: EventReader<FishingNoticeEvent>,
    mut start_events: EventReader<StartGameEvent>,
    mut snapshot: ResMut<DerbySnapshot>,
) {
    let mut last_catch = snapshot.last_catch.clone();
    if start_events.read().last().is_some() {
        last_catch = None;
    }
    for FishingNoticeEvent(notice) in notices.read() {
        if let FishingNotice::Caught(report) = notice {
            last_catch = Some(report.clone());
        }
    }

    let next = DerbySnapshot::capture(&game, &scoring, &fishing, last_catch);
    // Only write on change so UI systems can rely on change detection.
    if *snapshot != next {
        *snapshot = next;
    }
}
