use bevy::prelude::*;

use crate::config::DerbyConfig;
use crate::scheduler::{TaskId, TaskScheduler};
use crate::scoring::format_score;
use crate::shared::*;

const MAX_VISIBLE_TOASTS: usize = 3;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS & RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Marker for the toast container node (top-center of screen).
#[derive(Component)]
pub struct ToastContainer;

/// Marker for individual toast nodes, holding the dismissal token.
#[derive(Component)]
pub struct ToastItem {
    pub dismissal: TaskId,
}

/// Pending toast dismissals.
#[derive(Resource, Default)]
pub struct ToastTimers {
    scheduler: TaskScheduler<Entity>,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN CONTAINER
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_toast_container(mut commands: Commands) {
    commands.spawn((
        ToastContainer,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(60.0),
            left: Val::Percent(50.0),
            width: Val::Px(320.0),
            // Shift left by half of the width to truly center it.
            margin: UiRect {
                left: Val::Px(-160.0),
                ..default()
            },
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            align_items: AlignItems::Center,
            ..default()
        },
        PickingBehavior::IGNORE,
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// HANDLE TOAST EVENTS: spawn a child node per event
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_toast_events(
    mut commands: Commands,
    mut events: EventReader<ToastEvent>,
    mut timers: ResMut<ToastTimers>,
    container_query: Query<Entity, With<ToastContainer>>,
    existing_toasts: Query<(Entity, &ToastItem)>,
) {
    let Ok(container) = container_query.get_single() else {
        return;
    };

    let mut visible: Vec<(Entity, TaskId)> = existing_toasts
        .iter()
        .map(|(entity, item)| (entity, item.dismissal))
        .collect();
    // Oldest first: dismissal tokens are issued in spawn order.
    visible.sort_by_key(|(_, token)| *token);

    for event in events.read() {
        if visible.len() >= MAX_VISIBLE_TOASTS {
            let (oldest, token) = visible.remove(0);
            timers.scheduler.cancel(token);
            commands.entity(oldest).despawn_recursive();
        }

        let toast_entity = commands
            .spawn((
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(5.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                BorderColor(Color::srgba(0.5, 0.5, 0.5, 0.5)),
                PickingBehavior::IGNORE,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(event.message.clone()),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    PickingBehavior::IGNORE,
                ));
            })
            .id();

        let token = timers.scheduler.schedule(event.duration_secs, toast_entity);
        commands.entity(toast_entity).insert(ToastItem { dismissal: token });
        commands.entity(container).add_child(toast_entity);
        visible.push((toast_entity, token));
    }
}

/// Despawn toasts whose display time is up.
pub fn expire_toasts(mut commands: Commands, time: Res<Time>, mut timers: ResMut<ToastTimers>) {
    for (_, entity) in timers.scheduler.advance(time.delta_secs()) {
        if let Some(entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn_recursive();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENT-TO-TOAST WIRING
// ═══════════════════════════════════════════════════════════════════════

/// Overlay text for a fishing notice, if it warrants one.
pub fn notice_message(notice: &FishingNotice) -> Option<String> {
    match notice {
        FishingNotice::Bite { fish_name, .. } => Some(format!("Something's biting... {}!", fish_name)),
        FishingNotice::HitRegistered { hits, required } => {
            Some(format!("Hooked! {}/{}", hits, required))
        }
        FishingNotice::Caught(report) => {
            let mut message = if report.was_mystery {
                format!(
                    "Mystery revealed: {} pts, +{}s!",
                    report.base_points, report.time_added as i64
                )
            } else {
                format!("Caught {}!", report.fish_name)
            };
            message.push_str(&format!(" +{}", format_score(report.points_awarded)));
            if report.time_added > 0.0 && !report.was_mystery {
                message.push_str(&format!(" +{}s", report.time_added as i64));
            }
            if report.streak > 1 {
                message.push_str(&format!(" (x{:.1} streak)", report.streak_multiplier));
            }
            Some(message)
        }
        FishingNotice::Missed { penalty } => Some(format!("Fish got away! -{} points!", penalty)),
        FishingNotice::Cast { .. } | FishingNotice::Aborted => None,
    }
}

pub fn wire_fishing_toasts(
    mut notices: EventReader<FishingNoticeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    config: Res<DerbyConfig>,
) {
    for FishingNoticeEvent(notice) in notices.read() {
        if let Some(message) = notice_message(notice) {
            toast_writer.send(ToastEvent {
                message,
                duration_secs: config.toast_duration_secs,
            });
        }
    }
}

pub fn wire_game_over_toasts(
    mut game_over: EventReader<GameOverEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    config: Res<DerbyConfig>,
) {
    for event in game_over.read() {
        let message = if event.qualifies_for_leaderboard {
            format!("Time! {} - a new high score!", format_score(event.final_score))
        } else {
            format!("Time! Final score {}", format_score(event.final_score))
        };
        toast_writer.send(ToastEvent {
            message,
            duration_secs: config.toast_duration_secs * 2.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(was_mystery: bool, streak: u32) -> CatchReport {
        CatchReport {
            fish_id: "perch".into(),
            fish_name: "Perch".into(),
            base_points: 20,
            accuracy: 1.0,
            points_awarded: 24,
            time_added: 2.0,
            streak,
            streak_multiplier: 1.2,
            was_mystery,
        }
    }

    #[test]
    fn test_miss_message_shows_penalty() {
        let msg = notice_message(&FishingNotice::Missed { penalty: 20 }).unwrap();
        assert_eq!(msg, "Fish got away! -20 points!");
    }

    #[test]
    fn test_catch_message_lists_points_and_time() {
        let msg = notice_message(&FishingNotice::Caught(report(false, 1))).unwrap();
        assert_eq!(msg, "Caught Perch! +24 pts +2s");
    }

    #[test]
    fn test_mystery_catch_message_reveals_values() {
        let msg = notice_message(&FishingNotice::Caught(report(true, 3))).unwrap();
        assert!(msg.starts_with("Mystery revealed: 20 pts, +2s!"));
        assert!(msg.ends_with("(x1.2 streak)"));
    }

    #[test]
    fn test_silent_notices() {
        assert!(notice_message(&FishingNotice::Aborted).is_none());
        assert!(notice_message(&FishingNotice::Cast { target: Vec2::ZERO }).is_none());
    }
}
