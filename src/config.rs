//! Extractor configuration
//!
//! Thresholds for header detection, row reassembly and header-residue
//! filtering. Defaults match the Venda X Cliente report; a TOML file can
//! override them per installation:
//!
//! ```toml
//! min_numbers = 7
//! drop_header_residue = false
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::report::header::DEFAULT_HEADER_MIN_LABELS;
use crate::report::reassembler::{DEFAULT_MIN_DATES, DEFAULT_MIN_NUMBERS};

const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Dates a joined line needs before it is parsed as a row
    pub min_dates: usize,
    /// Number-like groups a joined line needs before it is parsed as a row
    pub min_numbers: usize,
    /// Labels a line needs to be taken as the header
    pub header_min_labels: usize,
    /// Skip label-only lines left by repeated or wrapped headers
    pub drop_header_residue: bool,
    /// Labels a date-free line needs to count as header residue
    pub residue_min_labels: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_dates: DEFAULT_MIN_DATES,
            min_numbers: DEFAULT_MIN_NUMBERS,
            header_min_labels: DEFAULT_HEADER_MIN_LABELS,
            drop_header_residue: true,
            residue_min_labels: 4,
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ExtractError::Config(e.to_string()).into())
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user file is read
    /// when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("Loading config from {:?}", path);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// `$XDG_CONFIG_HOME/vendas/config.toml`, or the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .map(|dir| dir.join("vendas").join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_report_layout() {
        let config = ExtractorConfig::default();
        assert_eq!(config.min_dates, 2);
        assert_eq!(config.min_numbers, 7);
        assert_eq!(config.header_min_labels, 8);
        assert!(config.drop_header_residue);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExtractorConfig::from_toml_str("min_numbers = 5\n").unwrap();
        assert_eq!(config.min_numbers, 5);
        assert_eq!(config.min_dates, 2);
        assert_eq!(config.residue_min_labels, 4);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = ExtractorConfig::from_toml_str("min_lines = 3\n").unwrap_err();
        assert!(err.downcast_ref::<ExtractError>().is_some());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vendas.toml");
        fs::write(&path, "drop_header_residue = false\nheader_min_labels = 6\n").unwrap();

        let config = ExtractorConfig::load(Some(&path)).unwrap();
        assert!(!config.drop_header_residue);
        assert_eq!(config.header_min_labels, 6);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(ExtractorConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
