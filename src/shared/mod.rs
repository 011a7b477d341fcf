//! Shared components, resources, events, and states for Harbor Derby.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain reaches into another domain's internals directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    MainMenu,
    Playing,
    /// Round is over and the score made the leaderboard.
    NameEntry,
}

// ═══════════════════════════════════════════════════════════════════════
// FISH CATALOG
// ═══════════════════════════════════════════════════════════════════════

pub type FishId = String;

/// One immutable catalog entry.
///
/// Mystery fish carry placeholder points/time values; the real values are
/// rolled when the fish is landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishType {
    pub id: FishId,
    pub name: String,
    pub base_points: i64,
    /// 1 = trivial. Drives skill-check speed, zone width and required hits.
    pub catch_difficulty: u32,
    /// Probability mass in (0, 1]. The catalog should sum to at most 1.0.
    pub spawn_weight: f64,
    pub time_bonus_secs: u32,
    pub is_mystery: bool,
}

/// Catalog in fixed declared order. Order matters for weighted selection.
#[derive(Resource, Debug, Clone, Default)]
pub struct FishRegistry {
    pub fish: Vec<FishType>,
}

impl FishRegistry {
    pub fn total_weight(&self) -> f64 {
        self.fish.iter().map(|f| f.spawn_weight).sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT EVENTS: produced by the input domain, consumed by gameplay
// ═══════════════════════════════════════════════════════════════════════

/// Pointer-down on the water: cast from `origin` toward `target` (world units).
#[derive(Event, Debug, Clone, Copy)]
pub struct CastRequestEvent {
    pub origin: Vec2,
    pub target: Vec2,
}

/// The skill-check key was pressed.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReelPressEvent;

/// Player asked to pull the line in without finishing.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CancelCastEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartGameEvent;

#[derive(Event, Debug, Clone)]
pub struct SubmitScoreEvent {
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════════════
// OUTPUT EVENTS: consumed by presentation
// ═══════════════════════════════════════════════════════════════════════

/// Sent once when the countdown ends a round.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameOverEvent {
    pub final_score: i64,
    pub qualifies_for_leaderboard: bool,
}

/// Result of landing a fish, surfaced to the UI as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchReport {
    pub fish_id: FishId,
    pub fish_name: String,
    /// Base points after any mystery reveal.
    pub base_points: i64,
    /// Accuracy multiplier from the skill check (1.0 or 0.75).
    pub accuracy: f64,
    /// Delta actually applied to the score.
    pub points_awarded: i64,
    /// Seconds actually added to the clock.
    pub time_added: f32,
    pub streak: u32,
    pub streak_multiplier: f64,
    pub was_mystery: bool,
}

/// State-transition notices emitted by the fishing session.
#[derive(Debug, Clone, PartialEq)]
pub enum FishingNotice {
    Cast { target: Vec2 },
    Bite { fish_name: String, difficulty: u32 },
    HitRegistered { hits: u32, required: u32 },
    Caught(CatchReport),
    Missed { penalty: i64 },
    /// The run was torn down without a catch (cancel, round over, bad state).
    Aborted,
}

#[derive(Event, Debug, Clone)]
pub struct FishingNoticeEvent(pub FishingNotice);

#[derive(Event, Debug, Clone)]
pub struct PlaySfxEvent {
    pub sfx_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT BINDINGS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub reel: KeyCode,
    pub cancel: KeyCode,
    pub start: KeyCode,
    pub cast: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            reel: KeyCode::Space,
            cancel: KeyCode::Escape,
            start: KeyCode::Space,
            cast: MouseButton::Left,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;
pub const LEADERBOARD_CAPACITY: usize = 10;
pub const MAX_NAME_LEN: usize = 12;
