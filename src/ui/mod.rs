mod audio;
mod hud;
mod menu;
mod toast;

pub use audio::notice_sfx;
pub use hud::format_clock;
pub use menu::leaderboard_lines;
pub use toast::{notice_message, ToastTimers};

use bevy::prelude::*;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySfxEvent>()
            .add_event::<ToastEvent>()
            .init_resource::<ToastTimers>();

        // ─── TOASTS (always present) ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (
                toast::wire_fishing_toasts,
                toast::wire_game_over_toasts,
                toast::handle_toast_events,
                toast::expire_toasts,
            )
                .chain(),
        );

        // ─── AUDIO ───
        app.add_systems(
            Update,
            (audio::wire_fishing_sfx, audio::handle_play_sfx).chain(),
        );

        // ─── MAIN MENU ───
        app.add_systems(OnEnter(GameState::MainMenu), menu::spawn_main_menu);
        app.add_systems(OnExit(GameState::MainMenu), menu::despawn_main_menu);

        // ─── HUD (Playing only) ───
        app.add_systems(OnEnter(GameState::Playing), hud::spawn_hud);
        app.add_systems(OnExit(GameState::Playing), hud::despawn_hud);
        app.add_systems(
            Update,
            (
                hud::update_hud_text,
                hud::update_skill_track,
                hud::update_bobber,
            )
                .run_if(in_state(GameState::Playing)),
        );

        // ─── NAME ENTRY ───
        app.add_systems(OnEnter(GameState::NameEntry), menu::spawn_name_entry);
        app.add_systems(OnExit(GameState::NameEntry), menu::despawn_name_entry);
        app.add_systems(
            Update,
            menu::update_name_entry_text.run_if(in_state(GameState::NameEntry)),
        );
    }
}
