//! Saved dashboard preferences.
//!
//! The chart remembers the analyst's last metric/range selection between
//! sessions. Persistence sits behind a narrow port so the generation core
//! stays pure and the backing medium is swappable (a JSON file here, an
//! in-memory slot for tests and embedding).

use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::domain::Preferences;
use crate::error::AppError;

/// File name of the preference blob inside the preference directory.
const PREFS_FILE: &str = "ltv_prefs.json";

/// Preference persistence port.
pub trait PrefStore {
    /// Load previously saved preferences.
    ///
    /// Missing or malformed data yields `None`: a stale preference file must
    /// never block startup, the dashboard just falls back to defaults.
    fn load(&self) -> Option<Preferences>;

    /// Persist the given preferences, replacing any prior value.
    fn save(&self, prefs: &Preferences) -> Result<(), AppError>;
}

/// JSON-file-backed store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the default store location.
    ///
    /// `LTV_PREFS_DIR` (environment or `.env`) overrides the directory;
    /// otherwise the file sits in the working directory.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let dir = std::env::var("LTV_PREFS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self {
            path: dir.join(PREFS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrefStore for JsonFileStore {
    fn load(&self) -> Option<Preferences> {
        let file = File::open(&self.path).ok()?;
        serde_json::from_reader(file).ok()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::input(format!(
                        "Failed to create preference dir '{}': {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let file = File::create(&self.path).map_err(|e| {
            AppError::input(format!(
                "Failed to create preference file '{}': {e}",
                self.path.display()
            ))
        })?;
        serde_json::to_writer_pretty(file, prefs)
            .map_err(|e| AppError::input(format!("Failed to write preferences: {e}")))?;

        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<Preferences>>,
}

impl PrefStore for MemoryStore {
    fn load(&self) -> Option<Preferences> {
        *self.slot.borrow()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), AppError> {
        *self.slot.borrow_mut() = Some(*prefs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Metric, RangePreset};

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(PREFS_FILE));

        assert_eq!(store.load(), None, "no file yet");

        let prefs = Preferences {
            metric: Metric::Payer,
            range: RangePreset::D60,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load(), Some(prefs));

        let replacement = Preferences {
            metric: Metric::Overall,
            range: RangePreset::D7,
        };
        store.save(&replacement).unwrap();
        assert_eq!(store.load(), Some(replacement));
    }

    #[test]
    fn malformed_file_falls_back_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.load(), None);

        // Saving over the corrupt file repairs it.
        store.save(&Preferences::default()).unwrap();
        assert_eq!(store.load(), Some(Preferences::default()));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::default();
        assert_eq!(store.load(), None);
        let prefs = Preferences::default();
        store.save(&prefs).unwrap();
        assert_eq!(store.load(), Some(prefs));
    }
}
