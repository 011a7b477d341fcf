//! In-round HUD: clock, score, streak, the skill-check track, and the bobber.
//!
//! Everything here reads `DerbySnapshot`; nothing writes game state.

use bevy::prelude::*;

use crate::fishing::FishingPhase;
use crate::scoring::format_score;
use crate::session::DerbySnapshot;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudTimeText;

#[derive(Component)]
pub struct HudScoreText;

#[derive(Component)]
pub struct HudStreakText;

/// Skill-check track container; hidden while no check runs.
#[derive(Component)]
pub struct SkillTrack;

#[derive(Component)]
pub struct SkillZone;

#[derive(Component)]
pub struct SkillMarker;

#[derive(Component)]
pub struct SkillHitsText;

#[derive(Component)]
pub struct Bobber;

const TRACK_WIDTH: f32 = 360.0;
const MARKER_WIDTH: f32 = 6.0;
const COLOR_TRACK: Color = Color::srgba(0.15, 0.15, 0.15, 0.85);
const COLOR_ZONE: Color = Color::srgb(0.2, 0.85, 0.3);
const COLOR_MARKER: Color = Color::srgb(0.95, 0.85, 0.1);
const COLOR_BOBBER: Color = Color::srgb(0.9, 0.2, 0.2);

/// `mm:ss`, rounding partial seconds up so the clock never shows 0:00 early.
pub fn format_clock(secs: f32) -> String {
    let total = secs.max(0.0).ceil() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

fn hud_text(size: f32) -> (TextFont, TextColor, PickingBehavior) {
    (
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
        PickingBehavior::IGNORE,
    )
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            // HUD must not swallow clicks meant for casting.
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            // ─── TOP BAR ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(44.0),
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|top_bar| {
                    top_bar.spawn((HudTimeText, Text::new("0:00"), hud_text(22.0)));
                    top_bar.spawn((HudStreakText, Text::new(""), hud_text(18.0)));
                    top_bar.spawn((HudScoreText, Text::new("0 pts"), hud_text(22.0)));
                });

            // ─── SKILL CHECK TRACK ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(6.0),
                        padding: UiRect::bottom(Val::Px(40.0)),
                        ..default()
                    },
                    PickingBehavior::IGNORE,
                ))
                .with_children(|bottom| {
                    bottom.spawn((SkillHitsText, Text::new(""), hud_text(16.0)));
                    bottom
                        .spawn((
                            SkillTrack,
                            Node {
                                width: Val::Px(TRACK_WIDTH),
                                height: Val::Px(24.0),
                                ..default()
                            },
                            BackgroundColor(COLOR_TRACK),
                            Visibility::Hidden,
                            PickingBehavior::IGNORE,
                        ))
                        .with_children(|track| {
                            track.spawn((
                                SkillZone,
                                Node {
                                    position_type: PositionType::Absolute,
                                    height: Val::Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(COLOR_ZONE),
                                PickingBehavior::IGNORE,
                            ));
                            track.spawn((
                                SkillMarker,
                                Node {
                                    position_type: PositionType::Absolute,
                                    width: Val::Px(MARKER_WIDTH),
                                    height: Val::Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(COLOR_MARKER),
                                PickingBehavior::IGNORE,
                            ));
                        });
                });
        });

    commands.spawn((
        Bobber,
        Sprite {
            color: COLOR_BOBBER,
            custom_size: Some(Vec2::new(10.0, 14.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 5.0),
        Visibility::Hidden,
    ));
}

pub fn despawn_hud(
    mut commands: Commands,
    query: Query<Entity, Or<(With<HudRoot>, With<Bobber>)>>,
) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

pub fn update_hud_text(
    snapshot: Res<DerbySnapshot>,
    mut time_query: Query<&mut Text, (With<HudTimeText>, Without<HudScoreText>, Without<HudStreakText>)>,
    mut score_query: Query<&mut Text, (With<HudScoreText>, Without<HudTimeText>, Without<HudStreakText>)>,
    mut streak_query: Query<&mut Text, (With<HudStreakText>, Without<HudTimeText>, Without<HudScoreText>)>,
) {
    if !snapshot.is_changed() {
        return;
    }
    for mut text in &mut time_query {
        **text = format_clock(snapshot.time_remaining);
    }
    for mut text in &mut score_query {
        **text = format_score(snapshot.score);
    }
    for mut text in &mut streak_query {
        **text = if snapshot.streak > 0 {
            format!("Streak {}  x{:.1}", snapshot.streak, snapshot.multiplier)
        } else {
            String::new()
        };
    }
}

pub fn update_skill_track(
    snapshot: Res<DerbySnapshot>,
    mut track_query: Query<&mut Visibility, With<SkillTrack>>,
    mut zone_query: Query<&mut Node, (With<SkillZone>, Without<SkillMarker>)>,
    mut marker_query: Query<&mut Node, (With<SkillMarker>, Without<SkillZone>)>,
    mut hits_query: Query<&mut Text, With<SkillHitsText>>,
) {
    if !snapshot.is_changed() {
        return;
    }
    let visible = snapshot.skill_check_active;
    for mut visibility in &mut track_query {
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut text in &mut hits_query {
        **text = if visible {
            format!("Press SPACE in the green! {}/{}", snapshot.hits, snapshot.required_hits)
        } else {
            String::new()
        };
    }
    if !visible {
        return;
    }

    let (zone_start, zone_end) = snapshot.zone_bounds;
    for mut node in &mut zone_query {
        node.left = Val::Percent(zone_start * 100.0);
        node.width = Val::Percent((zone_end - zone_start) * 100.0);
    }
    for mut node in &mut marker_query {
        node.left = Val::Px(snapshot.marker_position * (TRACK_WIDTH - MARKER_WIDTH));
    }
}

pub fn update_bobber(
    time: Res<Time>,
    snapshot: Res<DerbySnapshot>,
    mut bobber_query: Query<(&mut Transform, &mut Visibility), With<Bobber>>,
) {
    for (mut transform, mut visibility) in &mut bobber_query {
        let Some(target) = snapshot.cast_target else {
            *visibility = Visibility::Hidden;
            continue;
        };
        *visibility = Visibility::Inherited;
        // Gentle bob while waiting; sharp dips once a fish is on.
        let t = time.elapsed_secs();
        let offset = match snapshot.phase {
            FishingPhase::SkillCheck => (t * 18.0).sin() * 4.0 - 3.0,
            _ => (t * 3.0).sin() * 2.0,
        };
        transform.translation.x = target.x;
        transform.translation.y = target.y + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(120.0), "2:00");
        assert_eq!(format_clock(59.2), "1:00");
        assert_eq!(format_clock(9.0), "0:09");
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }
}
