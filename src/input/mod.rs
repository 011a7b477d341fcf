use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::DerbyConfig;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<NameEntryBuffer>()
            .add_event::<CastRequestEvent>()
            .add_event::<ReelPressEvent>()
            .add_event::<CancelCastEvent>()
            .add_systems(
                PreUpdate,
                read_menu_input.run_if(in_state(GameState::MainMenu)),
            )
            .add_systems(
                PreUpdate,
                read_fishing_input.run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::NameEntry), clear_name_buffer)
            .add_systems(
                PreUpdate,
                read_name_entry.run_if(in_state(GameState::NameEntry)),
            );
    }
}

/// Characters typed on the name-entry screen so far.
#[derive(Resource, Debug, Clone, Default)]
pub struct NameEntryBuffer {
    pub text: String,
}

impl NameEntryBuffer {
    pub fn push_str(&mut self, s: &str) {
        for ch in s.chars().filter(|c| !c.is_control()) {
            if self.text.chars().count() >= MAX_NAME_LEN {
                break;
            }
            self.text.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }
}

fn read_menu_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut start_events: EventWriter<StartGameEvent>,
) {
    if keys.just_pressed(bindings.start) {
        start_events.send(StartGameEvent);
    }
}

/// The single point where hardware input becomes fishing actions.
fn read_fishing_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<KeyBindings>,
    config: Res<DerbyConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut cast_events: EventWriter<CastRequestEvent>,
    mut reel_events: EventWriter<ReelPressEvent>,
    mut cancel_events: EventWriter<CancelCastEvent>,
) {
    if keys.just_pressed(bindings.reel) {
        reel_events.send(ReelPressEvent);
    }
    if keys.just_pressed(bindings.cancel) {
        cancel_events.send(CancelCastEvent);
    }
    if mouse.just_pressed(bindings.cast) {
        if let Some(target) = cursor_world_position(&windows, &cameras) {
            cast_events.send(CastRequestEvent {
                origin: config.cast_origin(),
                target,
            });
        }
    }
}

/// Project the cursor onto the water plane.
fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    let cursor = window.cursor_position()?;
    let (camera, camera_transform) = cameras.get_single().ok()?;
    camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

fn clear_name_buffer(mut buffer: ResMut<NameEntryBuffer>) {
    buffer.text.clear();
}

fn read_name_entry(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut buffer: ResMut<NameEntryBuffer>,
    mut submit_events: EventWriter<SubmitScoreEvent>,
) {
    for event in keyboard_events.read() {
        if !event.state.is_pressed() {
            continue;
        }
        match &event.logical_key {
            Key::Enter => {
                submit_events.send(SubmitScoreEvent {
                    name: buffer.text.clone(),
                });
            }
            Key::Backspace => buffer.backspace(),
            Key::Space => buffer.push_str(" "),
            Key::Character(s) => buffer.push_str(s.as_str()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_buffer_caps_length() {
        let mut buffer = NameEntryBuffer::default();
        buffer.push_str("abcdefghijklmnopq");
        assert_eq!(buffer.text.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_name_buffer_backspace_and_controls() {
        let mut buffer = NameEntryBuffer::default();
        buffer.push_str("Ann\u{8}");
        assert_eq!(buffer.text, "Ann");
        buffer.backspace();
        assert_eq!(buffer.text, "An");
    }
}
