//! Skill-check minigame.
//!
//! A marker sweeps a track from 0.0 to 1.0 and back. The catch zone is
//! centred on 0.5; its width shrinks as difficulty rises:
//!
//!  0.0                    0.5                    1.0
//!   |---------[=====catch zone=====]---------|
//!                  ^ marker bounces between the ends
//!
//! Pressing reel inside the zone counts a hit; `required_hits` hits land the
//! fish. A single press outside the zone loses it. The run never times out
//! on its own; it ends on success, failure, or `stop()`.

use bevy::prelude::*;

// ─── Tuning constants ─────────────────────────────────────────────────────────

/// Slowest allowed marker speed (track fractions per second).
pub const MIN_MARKER_SPEED: f32 = 0.05;
/// Narrowest allowed half-width of the catch zone.
pub const MIN_ZONE_HALF_WIDTH: f32 = 0.05;
/// Most hits any fish can demand.
pub const MAX_REQUIRED_HITS: u32 = 3;
/// Distance from centre that still counts as a perfect hit.
pub const PERFECT_WINDOW: f32 = 0.05;
pub const PERFECT_MULTIPLIER: f64 = 1.0;
pub const GOOD_MULTIPLIER: f64 = 0.75;

const ZONE_CENTER: f32 = 0.5;

/// Parameters derived from a fish's catch difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillCheckParams {
    pub speed: f32,
    pub zone_half_width: f32,
    pub required_hits: u32,
}

impl SkillCheckParams {
    pub fn for_difficulty(difficulty: u32) -> Self {
        let d = difficulty.max(1);
        let df = d as f32;
        Self {
            speed: (0.8 - 0.1 * df).max(MIN_MARKER_SPEED),
            zone_half_width: ((0.5 - 0.1 * df) / 2.0).max(MIN_ZONE_HALF_WIDTH),
            required_hits: d.min(MAX_REQUIRED_HITS),
        }
    }
}

/// What a reel press did to the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillCheckOutcome {
    /// No run was active.
    Ignored,
    /// Inside the zone, more hits still needed.
    Hit { hits: u32, required: u32 },
    /// Final hit landed. The run is over.
    Success { score_multiplier: f64 },
    /// Pressed outside the zone. The run is over.
    Miss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCheckEngine {
    active: bool,
    marker: f32,
    direction: f32,
    params: SkillCheckParams,
    current_hits: u32,
}

impl Default for SkillCheckEngine {
    fn default() -> Self {
        Self {
            active: false,
            marker: 0.0,
            direction: 1.0,
            params: SkillCheckParams::for_difficulty(1),
            current_hits: 0,
        }
    }
}

impl SkillCheckEngine {
    /// Begin a fresh run. Any run in progress is replaced.
    pub fn start(&mut self, difficulty: u32) {
        self.params = SkillCheckParams::for_difficulty(difficulty);
        self.marker = 0.0;
        self.direction = 1.0;
        self.current_hits = 0;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn marker_position(&self) -> f32 {
        self.marker
    }

    pub fn params(&self) -> SkillCheckParams {
        self.params
    }

    pub fn current_hits(&self) -> u32 {
        self.current_hits
    }

    /// `(zone_start, zone_end)` on the 0..1 track.
    pub fn zone_bounds(&self) -> (f32, f32) {
        (
            ZONE_CENTER - self.params.zone_half_width,
            ZONE_CENTER + self.params.zone_half_width,
        )
    }

    /// Animation step. Bounces the marker off both ends of the track.
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.marker += self.direction * self.params.speed * dt;
        if self.marker >= 1.0 {
            self.marker = 1.0;
            self.direction = -1.0;
        } else if self.marker <= 0.0 {
            self.marker = 0.0;
            self.direction = 1.0;
        }
    }

    /// Resolve a reel press against the current marker position.
    pub fn check_hit(&mut self) -> SkillCheckOutcome {
        if !self.active {
            return SkillCheckOutcome::Ignored;
        }

        let (zone_start, zone_end) = self.zone_bounds();
        if self.marker < zone_start || self.marker > zone_end {
            self.stop();
            return SkillCheckOutcome::Miss;
        }

        self.current_hits += 1;
        if self.current_hits < self.params.required_hits {
            return SkillCheckOutcome::Hit {
                hits: self.current_hits,
                required: self.params.required_hits,
            };
        }

        let score_multiplier = if (self.marker - ZONE_CENTER).abs() <= PERFECT_WINDOW {
            PERFECT_MULTIPLIER
        } else {
            GOOD_MULTIPLIER
        };
        self.stop();
        SkillCheckOutcome::Success { score_multiplier }
    }

    #[cfg(test)]
    pub(crate) fn set_marker(&mut self, position: f32) {
        self.marker = position;
    }
}
