//! Optional TOML configuration for the CLI
//!
//! Looked up from `--config` if given, else from
//! `<config dir>/sparsewav/config.toml`. Command-line flags win over file values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The full configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub expand: ExpandSettings,
    #[serde(default)]
    pub decompress: DecompressSettings,
    #[serde(default)]
    pub compress: CompressSettings,
}

/// `[expand]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpandSettings {
    pub max_file_duration: Option<u32>,
    pub prefix: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// `[decompress]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecompressSettings {
    pub output_dir: Option<PathBuf>,
}

/// `[compress]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressSettings {
    pub min_run: Option<u32>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Default config file location
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sparsewav").join("config.toml"))
    }

    /// Load the config.
    ///
    /// An explicit path must exist and parse. The default location is used
    /// only if a file is there; otherwise every setting is left unset.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            expand: ExpandSettings {
                max_file_duration: Some(3600),
                prefix: Some("SITE01".to_string()),
                output_dir: Some(PathBuf::from("expanded")),
            },
            decompress: DecompressSettings::default(),
            compress: CompressSettings {
                min_run: Some(4),
                output_dir: None,
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.expand.max_file_duration, Some(3600));
        assert_eq!(parsed.expand.prefix.as_deref(), Some("SITE01"));
        assert_eq!(parsed.compress.min_run, Some(4));
        assert!(parsed.decompress.output_dir.is_none());
    }

    #[test]
    fn test_partial_file() {
        let parsed: Config = toml::from_str("[decompress]\noutput_dir = \"restored\"\n").unwrap();

        assert_eq!(parsed.decompress.output_dir, Some(PathBuf::from("restored")));
        assert!(parsed.expand.max_file_duration.is_none());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparsewav.toml");
        fs::write(&path, "[expand]\nmax_file_duration = 60\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.expand.max_file_duration, Some(60));

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
