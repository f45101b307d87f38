//! Preference persistence: a single JSON file holding the scalar settings,
//! cached in memory and replaced atomically on every save.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use shared::Preferences;

pub struct PrefStore {
    path: PathBuf,
    cache: RwLock<Preferences>,
}

impl PrefStore {
    /// A missing file yields defaults; a present but unreadable or invalid
    /// file is an error so a corrupt save is not silently discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let prefs = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("could not read preferences file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid preferences file {}", path.display()))?
        } else {
            Preferences::default()
        };

        Ok(Self {
            path,
            cache: RwLock::new(prefs),
        })
    }

    pub fn get(&self) -> Preferences {
        match self.cache.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Write-then-rename so a crash mid-save leaves the previous file intact.
    pub fn set(&self, prefs: Preferences) -> Result<()> {
        let raw = serde_json::to_string_pretty(&prefs).context("could not encode preferences")?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)
            .with_context(|| format!("could not write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("could not replace {}", self.path.display()))?;

        match self.cache.write() {
            Ok(mut guard) => *guard = prefs,
            Err(poisoned) => *poisoned.into_inner() = prefs,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ShiftCommand, Theme};
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("famboard-prefs-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn missing_file_starts_with_defaults() {
        let store = PrefStore::open(scratch_path()).unwrap();
        assert_eq!(store.get(), Preferences::default());
    }

    #[test]
    fn saved_preferences_survive_reopen() {
        let path = scratch_path();
        let prefs = Preferences {
            theme: Theme::Sakura,
            weather_enabled: true,
            weather_zipcode: Some("1234567".to_string()),
            shift_commands: vec![ShiftCommand {
                command: "e".to_string(),
                name: "early shift".to_string(),
                time: Some("07:00".to_string()),
            }],
        };

        {
            let store = PrefStore::open(&path).unwrap();
            store.set(prefs.clone()).unwrap();
            assert_eq!(store.get(), prefs);
        }

        let reopened = PrefStore::open(&path).unwrap();
        assert_eq!(reopened.get(), prefs);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = scratch_path();
        std::fs::write(&path, "not json").unwrap();
        assert!(PrefStore::open(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
