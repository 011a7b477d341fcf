//! Casting, the bite timer, and per-frame session ticking.

use bevy::prelude::*;
use rand::Rng;

use crate::session::GameSession;
use crate::shared::*;
use super::fish_select::select_fish;
use super::{FishingPhase, FishingSession, FishingTask};

impl FishingSession {
    /// Throw the line. Only allowed while the round is running and the
    /// session is idle; otherwise nothing changes and `false` is returned.
    pub fn cast(
        &mut self,
        origin: Vec2,
        target: Vec2,
        game_active: bool,
        rng: &mut impl Rng,
    ) -> bool {
        if !game_active || self.phase != FishingPhase::Idle {
            return false;
        }

        self.phase = FishingPhase::Casting;
        self.cast_target = Some(target);
        self.notify(FishingNotice::Cast { target });

        let (min, max) = self.bite_delay;
        let delay = if max > min { rng.gen_range(min..=max) } else { min };
        self.cast_serial += 1;
        self.bite_task = Some(self.tasks.schedule(
            delay,
            FishingTask::Bite {
                cast_serial: self.cast_serial,
            },
        ));
        self.phase = FishingPhase::WaitingForBite;
        debug!(
            "Cast #{} from {:?} landed at {:?}, bite in {:.2}s",
            self.cast_serial, origin, target, delay
        );
        true
    }

    /// Per-frame step: animate the skill check and fire due timers.
    pub fn update(&mut self, dt: f32, registry: &FishRegistry, rng: &mut impl Rng) {
        self.skill_check.advance(dt);

        for (id, task) in self.tasks.advance(dt) {
            match task {
                FishingTask::Bite { cast_serial } => {
                    if self.bite_task == Some(id) {
                        self.bite_task = None;
                    }
                    if self.phase != FishingPhase::WaitingForBite
                        || cast_serial != self.cast_serial
                    {
                        debug!("Dropping stale bite from cast #{}", cast_serial);
                        continue;
                    }
                    self.trigger_bite(registry, rng);
                }
            }
        }
    }

    fn trigger_bite(&mut self, registry: &FishRegistry, rng: &mut impl Rng) {
        let Some(fish) = select_fish(registry, rng).cloned() else {
            warn!("Fish catalog is empty; reeling the line back in");
            self.abort();
            return;
        };

        self.skill_check.start(fish.catch_difficulty);
        self.notify(FishingNotice::Bite {
            fish_name: fish.name.clone(),
            difficulty: fish.catch_difficulty,
        });
        self.selected_fish = Some(fish);
        self.phase = FishingPhase::SkillCheck;
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Pointer-down on the water starts a cast.
pub fn handle_cast_requests(
    mut cast_events: EventReader<CastRequestEvent>,
    mut session: ResMut<FishingSession>,
    game: Res<GameSession>,
) {
    let mut rng = rand::thread_rng();
    for event in cast_events.read() {
        session.cast(event.origin, event.target, game.is_active(), &mut rng);
    }
}

/// Advance bite timers and the skill-check marker.
pub fn tick_fishing(
    time: Res<Time>,
    mut session: ResMut<FishingSession>,
    registry: Res<FishRegistry>,
) {
    if session.is_idle() {
        return;
    }
    let mut rng = rand::thread_rng();
    session.update(time.delta_secs(), &registry, &mut rng);
}
