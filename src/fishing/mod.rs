//! Fishing interaction core: cast, wait for a bite, skill check, resolve.
//!
//! `FishingSession` is a plain state machine stored as a resource. The
//! systems in this module only translate events into method calls; all rules
//! live on the struct so they can be exercised without an `App`.

use bevy::prelude::*;

use crate::config::DerbyConfig;
use crate::scheduler::{TaskId, TaskScheduler};
use crate::shared::*;

// ─── Sub-modules ────────────────────────────────────────────────────────────
mod cast;
mod fish_select;
mod minigame;
mod resolve;

pub use cast::*;
pub use fish_select::*;
pub use minigame::*;
pub use resolve::*;

// ─── Plugin ─────────────────────────────────────────────────────────────────

pub struct FishingPlugin;

impl Plugin for FishingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FishingSession>()
            .add_event::<FishingNoticeEvent>()
            .add_event::<CastRequestEvent>()
            .add_event::<ReelPressEvent>()
            .add_event::<CancelCastEvent>()
            .add_systems(Startup, configure_fishing)
            .add_systems(
                Update,
                (
                    cast::handle_cast_requests,
                    resolve::handle_cancel_requests,
                    cast::tick_fishing,
                    resolve::handle_reel_presses,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Round end aborts the session from outside Playing too, so
            // notices are flushed every frame regardless of state.
            .add_systems(PostUpdate, publish_fishing_notices);
    }
}

// ─── Session State ──────────────────────────────────────────────────────────

/// Phase of the fishing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FishingPhase {
    #[default]
    Idle,
    /// Line is in flight.
    Casting,
    /// Bobber is in the water; a bite is scheduled.
    WaitingForBite,
    /// A fish bit and the skill check is running.
    SkillCheck,
    /// A finished skill check is being applied to the score.
    Resolving,
}

/// One-shot work the session schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingTask {
    Bite { cast_serial: u64 },
}

#[derive(Resource, Debug)]
pub struct FishingSession {
    phase: FishingPhase,
    cast_target: Option<Vec2>,
    selected_fish: Option<FishType>,
    skill_check: SkillCheckEngine,
    tasks: TaskScheduler<FishingTask>,
    bite_task: Option<TaskId>,
    /// Bumped on every cast so a bite from an earlier cast is recognisable.
    cast_serial: u64,
    bite_delay: (f32, f32),
    miss_penalty: i64,
    notices: Vec<FishingNotice>,
}

impl Default for FishingSession {
    fn default() -> Self {
        Self::from_config(&DerbyConfig::default())
    }
}

impl FishingSession {
    pub fn from_config(config: &DerbyConfig) -> Self {
        Self {
            phase: FishingPhase::Idle,
            cast_target: None,
            selected_fish: None,
            skill_check: SkillCheckEngine::default(),
            tasks: TaskScheduler::new(),
            bite_task: None,
            cast_serial: 0,
            bite_delay: (config.bite_delay_min_secs, config.bite_delay_max_secs),
            miss_penalty: config.miss_penalty,
            notices: Vec::new(),
        }
    }

    pub fn apply_config(&mut self, config: &DerbyConfig) {
        self.bite_delay = (config.bite_delay_min_secs, config.bite_delay_max_secs);
        self.miss_penalty = config.miss_penalty;
    }

    pub fn phase(&self) -> FishingPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == FishingPhase::Idle
    }

    pub fn cast_target(&self) -> Option<Vec2> {
        self.cast_target
    }

    pub fn selected_fish(&self) -> Option<&FishType> {
        self.selected_fish.as_ref()
    }

    pub fn skill_check(&self) -> &SkillCheckEngine {
        &self.skill_check
    }

    /// Seconds until the pending bite fires, if one is scheduled.
    pub fn time_until_bite(&self) -> Option<f32> {
        self.bite_task.and_then(|id| self.tasks.time_until(id))
    }

    /// Take every notice emitted since the last drain, oldest first.
    pub fn drain_notices(&mut self) -> Vec<FishingNotice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: FishingNotice) {
        self.notices.push(notice);
    }
}

// ─── Systems ────────────────────────────────────────────────────────────────

fn configure_fishing(config: Res<DerbyConfig>, mut session: ResMut<FishingSession>) {
    session.apply_config(&config);
}

/// Forward session notices to the rest of the game.
pub fn publish_fishing_notices(
    mut session: ResMut<FishingSession>,
    mut notice_events: EventWriter<FishingNoticeEvent>,
) {
    // Avoid tripping change detection every frame.
    if session.notices.is_empty() {
        return;
    }
    for notice in session.drain_notices() {
        notice_events.send(FishingNoticeEvent(notice));
    }
}
