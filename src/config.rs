//! Configuration for the task-watching daemon.
//!
//! Everything lives in a single `config.toml`, including the persisted list
//! selection. The selection is overwritten whole on select/sign-out and
//! re-read once per poll cycle, so a concurrent CLI write is a benign
//! last-write-wins.

use crate::credentials::CredentialRef;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Tasks service settings.
    pub api: ApiConfig,
    /// Polling settings.
    pub poll: PollConfig,
    /// Notification output settings.
    pub notify: NotifyConfig,
    /// Persisted list selection.
    pub selection: Selection,
}

/// Tasks service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service base URL.
    pub base_url: String,
    /// Bearer token reference.
    pub token: CredentialRef,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tasks.googleapis.com".to_owned(),
            token: CredentialRef::default(),
        }
    }
}

/// Polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Fixed delay between poll cycles, in seconds.
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 120 }
    }
}

/// Notification output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Tap target shown alongside the notification.
    pub link: Option<String>,
    /// When set, the notification is written to this file instead of the
    /// terminal (for status-bar style consumers).
    pub status_path: Option<PathBuf>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            link: Some("https://tasks.google.com".to_owned()),
            status_path: None,
        }
    }
}

/// The single task list the user has chosen to monitor.
///
/// Absence of `list_id` means "no list selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// Identifier of the watched list.
    pub list_id: Option<String>,
    /// Title of the watched list, kept for display.
    pub list_title: Option<String>,
}

impl Selection {
    /// Returns `true` when a list is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.list_id.is_some()
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::TaskwatchError::Config(e.to_string()))
    }

    /// Load configuration, treating a missing file as all-defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &std::path::Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be
    /// serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TaskwatchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Persist a new list selection.
    pub fn select_list(&mut self, list_id: &str, list_title: &str) {
        self.selection = Selection {
            list_id: Some(list_id.to_owned()),
            list_title: Some(list_title.to_owned()),
        };
    }

    /// Clear the persisted selection (sign-out).
    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = WatchConfig::default();
        let result = toml::to_string_pretty(&config);
        assert!(result.is_ok(), "default config must serialize: {result:?}");
    }

    #[test]
    fn defaults_match_service() {
        let config = WatchConfig::default();
        assert_eq!(config.api.base_url, "https://tasks.googleapis.com");
        assert_eq!(config.poll.interval_secs, 120);
        assert!(!config.selection.is_selected());
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: WatchConfig = toml::from_str("").unwrap();
        assert_eq!(config.poll.interval_secs, 120);
        assert_eq!(config.selection, Selection::default());
    }

    #[test]
    fn selection_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = WatchConfig::default();
        config.select_list("MTIz", "Groceries");
        config.save_to_file(&path).unwrap();

        let loaded = WatchConfig::from_file(&path).unwrap();
        assert_eq!(loaded.selection.list_id.as_deref(), Some("MTIz"));
        assert_eq!(loaded.selection.list_title.as_deref(), Some("Groceries"));
    }

    #[test]
    fn clear_selection_removes_both_keys() {
        let mut config = WatchConfig::default();
        config.select_list("MTIz", "Groceries");
        config.clear_selection();
        assert_eq!(config.selection.list_id, None);
        assert_eq!(config.selection.list_title, None);
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = WatchConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert!(!config.selection.is_selected());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let toml_str = r#"
[selection]
list_id = "abc"
list_title = "Work"
"#;
        let config: WatchConfig = toml::from_str(toml_str).unwrap();
        assert!(config.selection.is_selected());
        assert_eq!(config.poll.interval_secs, 120);
        assert_eq!(config.api.token, CredentialRef::None);
    }
}
