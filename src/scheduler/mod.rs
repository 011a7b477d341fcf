//! One-shot scheduled tasks with cancel tokens.
//!
//! Each task owns a `Timer` that only moves when the host calls
//! [`TaskScheduler::advance`] with the frame delta. Every task whose timer
//! finishes fires on that call, in registration order, so two timers that
//! expire in the same frame always resolve the same way.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// Cancel token handed out by [`TaskScheduler::schedule`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    id: TaskId,
    timer: Timer,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct TaskScheduler<T> {
    next_id: u64,
    // Kept in registration order; ids are monotonically increasing.
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

/// Negative or non-finite seconds become zero.
fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or_default()
}

impl<T> TaskScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `payload` to fire `delay_secs` from now.
    /// Negative delays fire on the next `advance`.
    pub fn schedule(&mut self, delay_secs: f32, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            timer: Timer::new(secs(delay_secs), TimerMode::Once),
            payload,
        });
        id
    }

    /// Detach a pending task. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Seconds left before `id` fires, or `None` if it is not pending.
    pub fn time_until(&self, id: TaskId) -> Option<f32> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.timer.remaining_secs())
    }

    /// Tick every timer by `dt` and hand back every finished task, FIFO by
    /// registration.
    pub fn advance(&mut self, dt: f32) -> Vec<(TaskId, T)> {
        let delta = secs(dt);
        for task in &mut self.tasks {
            task.timer.tick(delta);
        }

        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.timer.finished());
        self.tasks = pending;

        due.into_iter().map(|t| (t.id, t.payload)).collect()
    }
}
