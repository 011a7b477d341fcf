use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::DerbyConfig;
use crate::session::{GameSession, Leaderboard, LeaderboardEntry};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════

/// Where the leaderboard lives between runs.
pub trait LeaderboardStore: Send + Sync {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, String>;
    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), String>;
}

/// The active store for this run.
#[derive(Resource)]
pub struct LeaderboardStorage(Box<dyn LeaderboardStore>);

impl LeaderboardStorage {
    pub fn new(store: impl LeaderboardStore + 'static) -> Self {
        Self(Box::new(store))
    }

    pub fn store(&self) -> &dyn LeaderboardStore {
        self.0.as_ref()
    }
}

pub fn encode_leaderboard(entries: &[LeaderboardEntry]) -> Result<String, String> {
    serde_json::to_string(entries).map_err(|e| format!("Serialization failed: {}", e))
}

pub fn decode_leaderboard(json: &str) -> Result<Vec<LeaderboardEntry>, String> {
    serde_json::from_str(json).map_err(|e| format!("Deserialization failed: {}", e))
}

// ═══════════════════════════════════════════════════════════════════════
// MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════

/// In-process store. Clones share the same backing list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<LeaderboardEntry>>>,
}

impl MemoryStore {
    pub fn with_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn snapshot(&self) -> Vec<LeaderboardEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, String> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .map_err(|e| format!("Memory store poisoned: {}", e))
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), String> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| format!("Memory store poisoned: {}", e))?;
        *guard = entries.to_vec();
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILE STORE (native)
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `saves/leaderboard.json` beside the executable.
    pub fn beside_executable() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(exe_dir.join("saves").join("leaderboard.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LeaderboardStore for FileStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, String> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read failed for {}: {}", self.path.display(), e))?;
        decode_leaderboard(&json)
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), String> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Could not create {}: {}", dir.display(), e))?;
        }
        let json = encode_leaderboard(entries)?;
        // Write to a temp file first, then rename for atomicity
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| format!("Rename failed: {}", e))?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LOCAL STORAGE STORE (browser)
// ═══════════════════════════════════════════════════════════════════════

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or_else(|| "No browser window".to_string())?
            .local_storage()
            .map_err(|e| format!("localStorage unavailable: {:?}", e))?
            .ok_or_else(|| "localStorage disabled".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, String> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| format!("Read failed for {}: {:?}", self.key, e))?;
        match raw {
            Some(json) => decode_leaderboard(&json),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), String> {
        let json = encode_leaderboard(entries)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|e| format!("Write failed for {}: {:?}", self.key, e))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_store(_config: &DerbyConfig) -> LeaderboardStorage {
    LeaderboardStorage::new(FileStore::beside_executable())
}

#[cfg(target_arch = "wasm32")]
fn platform_store(config: &DerbyConfig) -> LeaderboardStorage {
    LeaderboardStorage::new(LocalStorageStore::new(config.leaderboard_key.clone()))
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        // Tests supply a MemoryStore before adding the plugin.
        if !app.world().contains_resource::<LeaderboardStorage>() {
            let config = app
                .world()
                .get_resource::<DerbyConfig>()
                .cloned()
                .unwrap_or_default();
            app.insert_resource(platform_store(&config));
        }
        app.add_systems(OnEnter(GameState::Loading), load_leaderboard);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn load_leaderboard(storage: Res<LeaderboardStorage>, mut game: ResMut<GameSession>) {
    match storage.store().load() {
        Ok(entries) => {
            let board = Leaderboard::from_entries(entries);
            info!("Leaderboard loaded: {} entries", board.len());
            game.set_leaderboard(board);
        }
        Err(e) => {
            warn!("Could not load leaderboard ({}); starting empty", e);
            game.set_leaderboard(Leaderboard::default());
        }
    }
}
