//! The optional `cdoc.toml` settings file.

use anyhow::{Context, Result};
use cdoc_core::Format;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the settings file looked up next to the input.
pub const CONFIG_FILE: &str = "cdoc.toml";

/// Settings read from `cdoc.toml`; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format (`html`, `md` or `json`).
    pub format: Option<Format>,

    /// Page title, written as documentation text.
    pub title: Option<String>,

    /// Keep undocumented and static statements.
    pub keep_all: bool,

    /// Debug stages, as for `-d`.
    pub debug: Option<String>,
}

impl Config {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `explicit` if given, else `cdoc.toml` beside `input` when present.
    pub fn load(explicit: Option<&Path>, input: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = input
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config '{}'", path.display()))
    }
}
