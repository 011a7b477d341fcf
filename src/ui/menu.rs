use bevy::prelude::*;

use crate::input::NameEntryBuffer;
use crate::scoring::format_score;
use crate::session::{GameSession, Leaderboard};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct MainMenuRoot;

#[derive(Component)]
pub struct NameEntryRoot;

#[derive(Component)]
pub struct NameEntryText;

const COLOR_TITLE: Color = Color::srgb(1.0, 0.9, 0.5);
const COLOR_DIM: Color = Color::srgb(0.6, 0.7, 0.8);
const COLOR_BACKDROP: Color = Color::srgb(0.05, 0.12, 0.22);

fn text_style(size: f32, color: Color) -> (TextFont, TextColor) {
    (
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// One display line per leaderboard row, or a placeholder for an empty board.
pub fn leaderboard_lines(board: &Leaderboard) -> Vec<String> {
    if board.is_empty() {
        return vec!["No catches recorded yet".to_string()];
    }
    board
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>2}. {:<12} {:>10}  {}",
                i + 1,
                entry.name,
                format_score(entry.score),
                entry.date
            )
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// MAIN MENU
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_main_menu(mut commands: Commands, game: Res<GameSession>) {
    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(18.0),
                ..default()
            },
            BackgroundColor(COLOR_BACKDROP),
        ))
        .with_children(|parent| {
            parent.spawn((Text::new("HARBOR DERBY"), text_style(52.0, COLOR_TITLE)));
            parent.spawn((
                Text::new("Cast, hook, and land as many fish as you can before time runs out"),
                text_style(16.0, COLOR_DIM),
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Start,
                    row_gap: Val::Px(4.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                })
                .with_children(|board| {
                    board.spawn((Text::new("TOP ANGLERS"), text_style(20.0, COLOR_TITLE)));
                    for line in leaderboard_lines(game.leaderboard()) {
                        board.spawn((Text::new(line), text_style(16.0, Color::WHITE)));
                    }
                });

            parent.spawn((Text::new("Press SPACE to start"), text_style(22.0, Color::WHITE)));
        });
}

pub fn despawn_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NAME ENTRY
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_name_entry(mut commands: Commands, game: Res<GameSession>) {
    commands
        .spawn((
            NameEntryRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(COLOR_BACKDROP.with_alpha(0.92)),
        ))
        .with_children(|parent| {
            parent.spawn((Text::new("NEW HIGH SCORE!"), text_style(40.0, COLOR_TITLE)));
            parent.spawn((
                Text::new(format_score(game.final_score())),
                text_style(28.0, Color::WHITE),
            ));
            parent.spawn((Text::new("Enter your name:"), text_style(18.0, COLOR_DIM)));
            parent
                .spawn((
                    Node {
                        width: Val::Px(280.0),
                        height: Val::Px(40.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BorderColor(COLOR_TITLE),
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
                ))
                .with_children(|field| {
                    field.spawn((NameEntryText, Text::new("_"), text_style(24.0, Color::WHITE)));
                });
            parent.spawn((
                Text::new("ENTER to save"),
                text_style(14.0, COLOR_DIM),
            ));
        });
}

pub fn despawn_name_entry(mut commands: Commands, query: Query<Entity, With<NameEntryRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn update_name_entry_text(
    buffer: Res<NameEntryBuffer>,
    mut query: Query<&mut Text, With<NameEntryText>>,
) {
    if !buffer.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format!("{}_", buffer.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LeaderboardEntry;

    #[test]
    fn test_empty_board_shows_placeholder() {
        let lines = leaderboard_lines(&Leaderboard::default());
        assert_eq!(lines, vec!["No catches recorded yet".to_string()]);
    }

    #[test]
    fn test_board_lines_are_ranked() {
        let board = Leaderboard::from_entries(vec![
            LeaderboardEntry::new("Bo", 120, "2026-10-16"),
            LeaderboardEntry::new("Ann", 1500, "2026-10-17"),
        ]);
        let lines = leaderboard_lines(&board);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. Ann"));
        assert!(lines[0].contains("1,500 pts"));
        assert!(lines[1].starts_with(" 2. Bo"));
    }
}
