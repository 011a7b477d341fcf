use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use harbor_derby::shared::*;
use harbor_derby::{config, data, fishing, input, save, session, ui};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Harbor Derby".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Config first: every other plugin reads it at Startup.
        .add_plugins(config::ConfigPlugin)
        // Domain plugins
        .add_plugins(data::DataPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(fishing::FishingPlugin)
        .add_plugins(session::SessionPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(ui::UiPlugin)
        // Camera and backdrop
        .add_systems(Startup, (setup_camera, spawn_harbor))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Water fills the screen; the pier sits under the rod tip.
fn spawn_harbor(mut commands: Commands, config: Res<config::DerbyConfig>) {
    commands.spawn((
        Sprite {
            color: Color::srgb(0.12, 0.35, 0.55),
            custom_size: Some(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
    let origin = config.cast_origin();
    commands.spawn((
        Sprite {
            color: Color::srgb(0.45, 0.3, 0.18),
            custom_size: Some(Vec2::new(120.0, SCREEN_HEIGHT / 2.0 + origin.y + 20.0)),
            anchor: bevy::sprite::Anchor::TopCenter,
            ..default()
        },
        Transform::from_xyz(origin.x, origin.y, 1.0),
    ));
}
