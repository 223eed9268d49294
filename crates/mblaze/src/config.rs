//! Configuration for the mblaze front-end
//!
//! Settings are loaded from (in order of priority):
//! 1. An explicit JSON file passed by the caller
//! 2. `settings.json` in the mbtree config directory
//! 3. Built-in defaults
//!
//! The `MBTREE_ROOTS` environment variable (colon separated) overrides the
//! configured maildir roots.

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings filename in the mbtree config directory
const SETTINGS_FILE: &str = "settings.json";

/// Environment variable overriding the maildir roots
const ROOTS_ENV: &str = "MBTREE_ROOTS";

/// Names (or paths) of the mblaze programs to invoke
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub mdirs: String,
    pub mlist: String,
    pub mthread: String,
    pub mscan: String,
    pub mshow: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            mdirs: "mdirs".to_string(),
            mlist: "mlist".to_string(),
            mthread: "mthread".to_string(),
            mscan: "mscan".to_string(),
            mshow: "mshow".to_string(),
        }
    }
}

/// Front-end settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Programs to invoke
    pub tools: Tools,
    /// Maildir roots listed when none are given on the command line
    pub roots: Vec<String>,
    /// Worker thread count; `None` lets the pool pick one per CPU
    pub workers: Option<usize>,
}

impl Settings {
    /// Load settings using the following priority:
    /// 1. The given file, if any
    /// 2. settings.json in the config directory
    /// 3. Defaults
    ///
    /// Then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if config::config_exists(SETTINGS_FILE) => config::load_json(SETTINGS_FILE)?,
            None => {
                debug!("No {} found, using defaults", SETTINGS_FILE);
                Self::default()
            }
        };

        if let Some(roots) = Self::roots_from_env() {
            settings.roots = roots;
        }

        Ok(settings)
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Roots from the environment, if set and non-empty
    pub fn roots_from_env() -> Option<Vec<String>> {
        let value = std::env::var(ROOTS_ENV).ok()?;
        let roots = split_roots(&value);
        if roots.is_empty() { None } else { Some(roots) }
    }

    /// Get the default settings file path (~/.config/mbtree/settings.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }
}

/// Split a colon-separated list of roots, ignoring empty entries
fn split_roots(value: &str) -> Vec<String> {
    value
        .split(':')
        .map(str::trim)
        .filter(|root| !root.is_empty())
        .map(str::to_string)
        .collect()
}
