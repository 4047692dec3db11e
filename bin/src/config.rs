//! Configuration for the `blocks` CLI, loaded from `blocks.toml`.
//!
//! [`Config::load_with_overrides`] picks the file: `--config` override > `./blocks.toml` >
//! the embedded defaults in `bin/blocks.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "blocks.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Levels below a described node that are spelled out before switching to labels.
    #[serde(default = "default_description_depth")]
    pub description_depth: u32,

    /// Where to write the log file. A path without an extension is treated as a directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            description_depth: default_description_depth(),
            log_file: None,
        }
    }
}

fn default_description_depth() -> u32 {
    blocks_ast::DEFAULT_DESCRIPTION_DEPTH
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration with priority: CLI override > discovered path > defaults.
    pub fn load_with_overrides(
        cli_override: Option<&Path>,
        discovered_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = cli_override {
            return Self::load(path);
        }
        if let Some(path) = discovered_path {
            return Self::load(path);
        }
        Self::load_embedded()
    }

    /// `./blocks.toml`, if there is one
    pub fn discover() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE);
        path.is_file().then_some(path)
    }

    fn load_embedded() -> Result<Self> {
        let source = include_str!("../blocks.toml");
        toml::from_str(source).context("Failed to parse embedded blocks.toml")
    }
}
