//! Data layer: populates the fish catalog at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills FishRegistry from
//! the hard-coded design data in `fish.rs`, checks it, then transitions the
//! game into GameState::MainMenu.

mod fish;

pub use fish::{populate_fish, validate_catalog};

use bevy::prelude::*;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FishRegistry>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

fn load_all_data(
    mut fish_registry: ResMut<FishRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating fish catalog…");

    fish::populate_fish(&mut fish_registry);
    info!(
        "  Fish loaded: {} (total spawn weight {:.2})",
        fish_registry.fish.len(),
        fish_registry.total_weight()
    );

    for problem in fish::validate_catalog(&fish_registry) {
        warn!("  Fish catalog: {}", problem);
    }

    info!("DataPlugin: catalog ready. Transitioning to MainMenu.");
    next_state.set(GameState::MainMenu);
}
