//! Tunable game settings.
//!
//! Native builds look for `derby.ron` next to the executable; anything
//! missing from the file keeps its default. The browser build always uses
//! the defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "derby.ron";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerbyConfig {
    /// Length of one round, in seconds.
    pub session_duration_secs: f32,
    pub bite_delay_min_secs: f32,
    pub bite_delay_max_secs: f32,
    /// Flat points removed on a failed skill check.
    pub miss_penalty: i64,
    pub toast_duration_secs: f32,
    /// Browser local-storage key for the leaderboard.
    pub leaderboard_key: String,
    /// Rod tip in world units; casts start here.
    pub cast_origin: (f32, f32),
}

impl Default for DerbyConfig {
    fn default() -> Self {
        Self {
            session_duration_secs: 120.0,
            bite_delay_min_secs: 2.0,
            bite_delay_max_secs: 7.0,
            miss_penalty: 20,
            toast_duration_secs: 2.0,
            leaderboard_key: "harbor_derby.leaderboard".to_string(),
            cast_origin: (0.0, -180.0),
        }
    }
}

impl DerbyConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        ron::from_str::<DerbyConfig>(text)
            .map(DerbyConfig::validated)
            .map_err(|e| format!("Invalid {}: {}", CONFIG_FILE_NAME, e))
    }

    /// Repair values that would break the game loop.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.session_duration_secs, defaults.session_duration_secs),
            (&mut self.bite_delay_min_secs, defaults.bite_delay_min_secs),
            (&mut self.bite_delay_max_secs, defaults.bite_delay_max_secs),
            (&mut self.toast_duration_secs, defaults.toast_duration_secs),
            (&mut self.cast_origin.0, defaults.cast_origin.0),
            (&mut self.cast_origin.1, defaults.cast_origin.1),
        ] {
            if !value.is_finite() {
                *value = fallback;
            }
        }
        if self.bite_delay_min_secs > self.bite_delay_max_secs {
            std::mem::swap(&mut self.bite_delay_min_secs, &mut self.bite_delay_max_secs);
        }
        self.bite_delay_min_secs = self.bite_delay_min_secs.max(0.0);
        self.bite_delay_max_secs = self.bite_delay_max_secs.max(self.bite_delay_min_secs);
        if self.session_duration_secs <= 0.0 {
            self.session_duration_secs = defaults.session_duration_secs;
        }
        if self.toast_duration_secs <= 0.0 {
            self.toast_duration_secs = defaults.toast_duration_secs;
        }
        self.miss_penalty = self.miss_penalty.saturating_abs();
        self
    }

    pub fn cast_origin(&self) -> Vec2 {
        Vec2::new(self.cast_origin.0, self.cast_origin.1)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_config() -> Result<Option<DerbyConfig>, String> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    DerbyConfig::from_ron_str(&text).map(Some)
}

#[cfg(target_arch = "wasm32")]
fn read_config() -> Result<Option<DerbyConfig>, String> {
    Ok(None)
}

/// Resolve the config for this run, falling back to defaults on any error.
pub fn load_config() -> DerbyConfig {
    match read_config() {
        Ok(Some(config)) => {
            info!("Loaded {}", CONFIG_FILE_NAME);
            config
        }
        Ok(None) => DerbyConfig::default(),
        Err(e) => {
            warn!("{}; using default settings", e);
            DerbyConfig::default()
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        // Tests insert their own config before adding plugins.
        if !app.world().contains_resource::<DerbyConfig>() {
            app.insert_resource(load_config());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bite_window() {
        let config = DerbyConfig::default();
        assert_eq!(config.bite_delay_min_secs, 2.0);
        assert_eq!(config.bite_delay_max_secs, 7.0);
        assert_eq!(config.miss_penalty, 20);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = DerbyConfig::from_ron_str("(session_duration_secs: 45.0)").unwrap();
        assert_eq!(config.session_duration_secs, 45.0);
        assert_eq!(config.bite_delay_max_secs, 7.0);
        assert_eq!(config.leaderboard_key, "harbor_derby.leaderboard");
    }

    #[test]
    fn test_inverted_bite_bounds_are_swapped() {
        let config =
            DerbyConfig::from_ron_str("(bite_delay_min_secs: 9.0, bite_delay_max_secs: 3.0)")
                .unwrap();
        assert_eq!(config.bite_delay_min_secs, 3.0);
        assert_eq!(config.bite_delay_max_secs, 9.0);
    }

    #[test]
    fn test_nonpositive_duration_restored() {
        let config = DerbyConfig::from_ron_str("(session_duration_secs: -1.0)").unwrap();
        assert_eq!(config.session_duration_secs, 120.0);
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let config = DerbyConfig::from_ron_str(
            "(session_duration_secs: NaN, bite_delay_max_secs: inf, toast_duration_secs: -inf, cast_origin: (NaN, 4.0))",
        )
        .unwrap();
        assert_eq!(config.session_duration_secs, 120.0);
        assert_eq!(config.bite_delay_min_secs, 2.0);
        assert_eq!(config.bite_delay_max_secs, 7.0);
        assert_eq!(config.toast_duration_secs, 2.0);
        assert_eq!(config.cast_origin, (0.0, 4.0));
    }

    #[test]
    fn test_infinite_bite_delay_still_casts() {
        use crate::fishing::FishingSession;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let config = DerbyConfig::from_ron_str("(bite_delay_max_secs: inf)").unwrap();
        let mut fishing = FishingSession::from_config(&config);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(fishing.cast(Vec2::ZERO, Vec2::ONE, true, &mut rng));
        let delay = fishing.time_until_bite().unwrap();
        assert!((2.0..=7.0).contains(&delay));
    }

    #[test]
    fn test_nan_duration_round_still_ends() {
        use crate::fishing::FishingSession;
        use crate::scoring::ScoreStreakModel;
        use crate::session::GameSession;

        let config = DerbyConfig::from_ron_str("(session_duration_secs: NaN)").unwrap();
        let mut game = GameSession::new(config.session_duration_secs);
        let mut scoring = ScoreStreakModel::default();
        let mut fishing = FishingSession::default();
        game.start_game(&mut scoring, &mut fishing);
        assert!(game.tick(1e6, &scoring, &mut fishing));
        assert!(!game.is_active());
    }

    #[test]
    fn test_malformed_ron_is_an_error() {
        let err = DerbyConfig::from_ron_str("(session_duration_secs: \"soon\")").unwrap_err();
        assert!(err.contains(CONFIG_FILE_NAME));
    }
}
