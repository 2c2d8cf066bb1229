//! Application paths for config and data.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "MODELSYNC_DATA_DIR";

/// Application paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
    /// Data directory (key/value store lives under it).
    pub data: PathBuf,
}

impl AppPaths {
    /// Platform paths for modelsync, honoring `MODELSYNC_DATA_DIR`.
    #[must_use]
    pub fn new() -> Self {
        let mut paths = Self::platform();
        if let Some(dir) = std::env::var_os(ENV_DATA_DIR).filter(|d| !d.is_empty()) {
            paths.data = PathBuf::from(dir);
        }
        paths
    }

    /// Paths rooted at an explicit directory (tests, embedding).
    #[must_use]
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join("config"),
            data: root.join("data"),
        }
    }

    fn platform() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("dev", "modelsync", "modelsync") {
            Self {
                config: proj_dirs.config_dir().to_path_buf(),
                data: proj_dirs.data_dir().to_path_buf(),
            }
        } else {
            // Fallback to home directory
            let home = directories::BaseDirs::new()
                .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
            Self {
                config: home.join(".config/modelsync"),
                data: home.join(".local/share/modelsync"),
            }
        }
    }

    /// Directory backing the key/value store.
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.data.join("store")
    }

    /// Path to the TOML config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_paths() {
        let paths = AppPaths::rooted_at("/tmp/ms");
        assert_eq!(paths.store_dir(), PathBuf::from("/tmp/ms/data/store"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/ms/config/config.toml"));
    }

    #[test]
    fn platform_paths_are_app_scoped() {
        let paths = AppPaths::platform();
        assert!(paths.config.to_string_lossy().contains("modelsync"));
        assert!(paths.data.to_string_lossy().contains("modelsync"));
    }
}
