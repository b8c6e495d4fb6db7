//! High-score persistence port
//!
//! Each engine reads one scalar at construction and writes it back on game
//! over when beaten. The store is injected rather than reached through a
//! process-wide default, so engines are testable without real persistence.
//! Writes are write-through and fire-and-forget: a failed write is logged and
//! never surfaces to the simulation tick.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Storage key for the runner engine
pub const RUNNER_KEY: &str = "runner_high_score";
/// Storage key for the flight engine
pub const FLIGHT_KEY: &str = "flight_high_score";
/// Storage key for the orbital engine
pub const ORBITAL_KEY: &str = "orbital_high_score";
/// Storage key for the grid engine
pub const GRID_KEY: &str = "grid_high_score";

/// Keyed scalar store for per-game high scores.
///
/// The scalar is an `f64` for every game; engines with integer scores convert
/// at the boundary. Keys must not collide across games.
pub trait ScoreStore {
    /// Read the stored value for `key`, or `0.0` when absent.
    fn read(&self, key: &str) -> f64;

    /// Persist `value` under `key`.
    fn write(&mut self, key: &str, value: f64);
}

/// In-memory store for tests and embedding without persistence.
///
/// Clones share one table, which lets a test keep a handle on the store an
/// engine owns and observe its writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, f64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> f64 {
        self.values.borrow().get(key).copied().unwrap_or(0.0)
    }

    fn write(&mut self, key: &str, value: f64) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

/// JSON-file-backed store.
///
/// The whole table is read once at open and rewritten on every write. A
/// missing or corrupt file starts an empty table rather than failing.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, f64>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HashMap<String, f64>>(&json) {
                Ok(values) => {
                    log::info!("loaded {} scores from {}", values.len(), path.display());
                    values
                }
                Err(err) => {
                    log::warn!(
                        "score file {} is corrupt, starting fresh: {err}",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }
}

impl ScoreStore for JsonFileStore {
    fn read(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    fn write(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
        match serde_json::to_string(&self.values) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    log::warn!("failed to persist scores to {}: {err}", self.path.display());
                }
            }
            Err(err) => log::warn!("failed to encode score table: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_reads_zero_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.read(RUNNER_KEY), 0.0);
    }

    #[test]
    fn test_memory_store_clones_share_table() {
        let mut store = MemoryStore::new();
        let observer = store.clone();
        store.write(FLIGHT_KEY, 12.0);
        assert_eq!(observer.read(FLIGHT_KEY), 12.0);
    }

    #[test]
    fn test_keys_are_distinct() {
        let keys = [RUNNER_KEY, FLIGHT_KEY, ORBITAL_KEY, GRID_KEY];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_json_store_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "arcade_cabinet_scores_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.read(GRID_KEY), 0.0);
        store.write(GRID_KEY, 7.0);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.read(GRID_KEY), 7.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_survives_corrupt_file() {
        let path = std::env::temp_dir().join(format!(
            "arcade_cabinet_corrupt_{}.json",
            std::process::id()
        ));
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.read(ORBITAL_KEY), 0.0);

        let _ = fs::remove_file(&path);
    }
}
