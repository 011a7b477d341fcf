use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// CUE MAPPING
// ═══════════════════════════════════════════════════════════════════════

/// Sound cue for a fishing notice (cast, bite, catch, miss).
pub fn notice_sfx(notice: &FishingNotice) -> Option<&'static str> {
    match notice {
        FishingNotice::Cast { .. } => Some("fishing_cast"),
        FishingNotice::Bite { .. } => Some("fish_bite"),
        FishingNotice::HitRegistered { .. } => Some("reel_tick"),
        FishingNotice::Caught(_) => Some("fish_caught"),
        FishingNotice::Missed { .. } => Some("fish_escape"),
        FishingNotice::Aborted => None,
    }
}

/// Maps SFX IDs to actual audio file paths.
fn sfx_path(sfx_id: &str) -> Option<&'static str> {
    match sfx_id {
        "fishing_cast" => Some("audio/sfx/sfx_movement_jump1.ogg"),
        "fish_bite" => Some("audio/sfx/sfx_sounds_interaction5.ogg"),
        "reel_tick" => Some("audio/sfx/sfx_menu_move1.ogg"),
        "fish_caught" => Some("audio/sfx/sfx_sounds_fanfare1.ogg"),
        "fish_escape" => Some("audio/sfx/sfx_sounds_error1.ogg"),
        "game_over" => Some("audio/sfx/sfx_sounds_powerup1.ogg"),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn wire_fishing_sfx(
    mut notices: EventReader<FishingNoticeEvent>,
    mut game_over: EventReader<GameOverEvent>,
    mut sfx_events: EventWriter<PlaySfxEvent>,
) {
    for FishingNoticeEvent(notice) in notices.read() {
        if let Some(sfx_id) = notice_sfx(notice) {
            sfx_events.send(PlaySfxEvent {
                sfx_id: sfx_id.to_string(),
            });
        }
    }
    for _ in game_over.read() {
        sfx_events.send(PlaySfxEvent {
            sfx_id: "game_over".to_string(),
        });
    }
}

/// Listen for PlaySfxEvent and spawn one-shot audio sources that auto-despawn.
pub fn handle_play_sfx(
    mut events: EventReader<PlaySfxEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    for event in events.read() {
        if let Some(path) = sfx_path(&event.sfx_id) {
            commands.spawn((
                AudioPlayer::new(asset_server.load(path)),
                PlaybackSettings::DESPAWN,
            ));
        } else {
            debug!("No sound mapped for {}", event.sfx_id);
        }
    }
}
