//! Application directory paths.
//!
//! Single source of truth for filesystem paths used by taskwatch. Uses the
//! [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Environment Overrides
//!
//! - `TASKWATCH_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application config directory.
///
/// Holds `config.toml` (settings plus the persisted list selection).
///
/// Resolves to `dirs::config_dir()/taskwatch/` by default. Override with
/// the `TASKWATCH_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("TASKWATCH_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("taskwatch"))
        .unwrap_or_else(|| PathBuf::from("/tmp/taskwatch-config"))
}

/// Default config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn config_path_is_under_config_dir() {
        let path = config_path();
        assert!(path.starts_with(config_dir()));
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
