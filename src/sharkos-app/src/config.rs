// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SHARKOS_CONFIG";

/// Candidate locations for `sharkos.toml`, most specific first:
/// `$SHARKOS_CONFIG`, the current directory, the XDG config dir, `/etc`.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(env_path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(env_path));
    }
    paths.push(PathBuf::from("sharkos.toml"));
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("sharkos").join("sharkos.toml"));
    }
    paths.push(PathBuf::from("/etc/sharkos/sharkos.toml"));
    paths
}

/// Extract and deserialize a named section from a TOML file.
///
/// Returns `Ok(Some(cfg))` when the section is present and parses cleanly,
/// `Ok(None)` when the section is absent, or `Err` on I/O / parse failure.
fn load_section_from_file<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

    let table: toml::Table = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

    let Some(section) = table.get(key) else {
        return Ok(None);
    };

    // Re-serialize the section then parse as T so all serde defaults apply.
    let section_toml = toml::to_string(section)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
    let cfg = toml::from_str::<T>(&section_toml)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
    Ok(Some(cfg))
}

/// Trait for loading configuration from a `sharkos.toml` section.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section key in `sharkos.toml` (e.g. `"sharkos-monitor"`).
    fn section_key() -> &'static str;

    /// Load the section from a specific file path.
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// does not contain the expected `[<section_key>]` header.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_section_from_file::<Self>(path, Self::section_key())?.ok_or_else(|| {
            ConfigError::ParseError(
                path.to_path_buf(),
                format!("missing [{}] section", Self::section_key()),
            )
        })
    }

    /// Load the first search path whose file carries our section.
    ///
    /// Returns `(config, path_where_found)` or `(Default::default(), None)`
    /// when no file has the section.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let key = Self::section_key();
        for path in config_search_paths().into_iter().filter(|p| p.exists()) {
            if let Some(cfg) = load_section_from_file::<Self>(&path, key)? {
                return Ok((cfg, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Load from `explicit` when given (the section must exist there),
    /// otherwise from the default search paths.
    fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match explicit {
            Some(path) => Ok((Self::load_from_file(path)?, Some(path.to_path_buf()))),
            None => Self::load_from_default_paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        retries: u32,
    }

    impl ConfigFile for Sample {
        fn section_key() -> &'static str {
            "sample"
        }
    }

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_section_applies_defaults() {
        let file = write_toml("[sample]\nname = \"x\"\n\n[other]\nretries = 9\n");
        let cfg = Sample::load_from_file(file.path()).unwrap();
        assert_eq!(cfg.name, "x");
        assert_eq!(cfg.retries, 0);
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let file = write_toml("[other]\nname = \"x\"\n");
        let err = Sample::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("missing [sample] section"));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let file = write_toml("[sample\n");
        assert!(matches!(
            Sample::load_from_file(file.path()),
            Err(ConfigError::ParseError(_, _))
        ));
    }

    #[test]
    fn test_explicit_path_wins() {
        let file = write_toml("[sample]\nretries = 4\n");
        let (cfg, found) = Sample::load(Some(file.path())).unwrap();
        assert_eq!(cfg.retries, 4);
        assert_eq!(found.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_search_paths_end_with_system_dir() {
        let paths = config_search_paths();
        assert_eq!(
            paths.last(),
            Some(&PathBuf::from("/etc/sharkos/sharkos.toml"))
        );
        assert!(paths.contains(&PathBuf::from("sharkos.toml")));
    }

    #[test]
    fn test_unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Sample::load_from_file(&dir.path().join("absent.toml")),
            Err(ConfigError::ReadError(_, _))
        ));
    }
}
