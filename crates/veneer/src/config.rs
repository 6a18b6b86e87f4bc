//! Configuration file handling (`veneer.toml`).
//!
//! The file is optional; every setting has a built-in default and CLI
//! flags override whatever the file says. A missing file at the default
//! location means defaults; a file that exists but does not parse is a
//! startup error, since silently ignoring a typo'd config is worse than
//! failing.
//!
//! ```toml
//! [build]
//! themes-dir = "themes"
//! out-dir = "dist/themes"
//!
//! [watch]
//! debounce-ms = 150
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "veneer.toml";

/// Top-level veneer configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub watch: WatchSection,
}

/// The `[build]` section: where manifests live and where sheets go.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    #[serde(default = "default_themes_dir")]
    pub themes_dir: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        BuildSection {
            themes_dir: default_themes_dir(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_themes_dir() -> PathBuf {
    PathBuf::from("themes")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist/themes")
}

/// The `[watch]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WatchSection {
    /// Quiet window after the last filesystem event before a rebuild
    /// fires. A burst of events collapses into one build.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        WatchSection {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    150
}

impl Config {
    /// Loads configuration for a run.
    ///
    /// An explicit `--config` path must exist; without one, the default
    /// file is used when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        match explicit {
            Some(path) => Config::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Config::from_file(default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Reads and parses one configuration file.
    pub fn from_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.build.themes_dir, PathBuf::from("themes"));
        assert_eq!(config.build.out_dir, PathBuf::from("dist/themes"));
        assert_eq!(config.watch.debounce_ms, 150);
    }

    #[test]
    fn test_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("veneer.toml");
        fs::write(
            &path,
            "[build]\nthemes-dir = \"tokens\"\nout-dir = \"public/css\"\n\n[watch]\ndebounce-ms = 300\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.build.themes_dir, PathBuf::from("tokens"));
        assert_eq!(config.build.out_dir, PathBuf::from("public/css"));
        assert_eq!(config.watch.debounce_ms, 300);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("veneer.toml");
        fs::write(&path, "[build]\nthemes-dir = \"tokens\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.build.themes_dir, PathBuf::from("tokens"));
        assert_eq!(config.build.out_dir, PathBuf::from("dist/themes"));
        assert_eq!(config.watch.debounce_ms, 150);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("veneer.toml");
        fs::write(&path, "[build\nthemes-dir = ").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
