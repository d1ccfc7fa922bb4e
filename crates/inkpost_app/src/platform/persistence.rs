use std::path::PathBuf;

use inkpost_core::Theme;
use inkpost_engine::AtomicFileWriter;
use inkpost_logging::{ink_error, ink_info, ink_warn};
use serde::{Deserialize, Serialize};

const PREFS_FILENAME: &str = "preferences.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedPreferences {
    #[serde(default)]
    theme: Option<String>,
}

/// Local preferences kept in the state directory.
pub struct PreferenceStore {
    writer: AtomicFileWriter,
}

impl PreferenceStore {
    pub fn new(state_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(state_dir),
        }
    }

    /// The saved theme, or `None` when nothing usable is stored.
    pub fn load_theme(&self) -> Option<Theme> {
        let content = match self.writer.read(PREFS_FILENAME) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                ink_warn!(
                    "Failed to read preferences from {:?}: {}",
                    self.writer.dir(),
                    err
                );
                return None;
            }
        };

        let prefs: PersistedPreferences = match ron::from_str(&content) {
            Ok(prefs) => prefs,
            Err(err) => {
                ink_warn!("Failed to parse preferences: {}", err);
                return None;
            }
        };
        prefs.theme.as_deref().and_then(Theme::parse)
    }

    pub fn save_theme(&self, theme: Theme) {
        let prefs = PersistedPreferences {
            theme: Some(theme.as_str().to_string()),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&prefs, pretty) {
            Ok(text) => text,
            Err(err) => {
                ink_error!("Failed to serialize preferences: {}", err);
                return;
            }
        };

        match self.writer.write(PREFS_FILENAME, &content) {
            Ok(path) => ink_info!("Saved theme {} to {:?}", theme.as_str(), path),
            Err(err) => ink_error!(
                "Failed to write preferences to {:?}: {}",
                self.writer.dir(),
                err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn theme_round_trips_through_state_dir() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path().join("state"));
        assert_eq!(store.load_theme(), None);

        store.save_theme(Theme::Dark);
        assert_eq!(store.load_theme(), Some(Theme::Dark));

        store.save_theme(Theme::Light);
        assert_eq!(store.load_theme(), Some(Theme::Light));
    }

    #[test]
    fn unreadable_preferences_fall_back_to_none() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PREFS_FILENAME), "not ron at all (").unwrap();
        let store = PreferenceStore::new(temp.path().to_path_buf());
        assert_eq!(store.load_theme(), None);
    }

    #[test]
    fn unknown_theme_value_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PREFS_FILENAME),
            "(theme: Some(\"sepia\"))",
        )
        .unwrap();
        let store = PreferenceStore::new(temp.path().to_path_buf());
        assert_eq!(store.load_theme(), None);
    }
}
