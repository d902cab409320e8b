//! Project configuration from `.phpdoc-lint.toml`.
//!
//! Everything in the file is optional and CLI flags take precedence. A
//! malformed config file warns and falls back to defaults rather than
//! aborting the run.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::CacheMode;
use crate::io::OutputFormat;

pub const CONFIG_FILE_NAME: &str = ".phpdoc-lint.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paths to scan when the command line names none.
    pub paths: Vec<PathBuf>,
    /// Glob patterns for files to skip.
    pub exclude: Vec<String>,
    /// Report missing @param / @return tags.
    pub report_missing: bool,
    pub format: Option<OutputFormat>,
    pub cache: CacheConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub file: Option<PathBuf>,
    pub mode: CacheMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
            mode: CacheMode::Hash,
        }
    }
}

pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str(contents).map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))
}

fn try_load_from_path(path: &Path) -> Option<Config> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {e}", path.display());
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            None
        }
    }
}

/// Find and load the config file from the current directory or one of its
/// ancestors. Missing or unusable config yields the defaults.
pub fn load_config() -> Config {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {e}. Using default config.");
            return Config::default();
        }
    };

    std::iter::successors(Some(current), |dir| dir.parent().map(Path::to_path_buf))
        .take(MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_from_path(&path))
        .unwrap_or_default()
}

/// Commented starter config written by `init`.
pub fn default_config_template() -> &'static str {
    r#"# phpdoc-lint configuration

# Paths scanned when none are given on the command line.
paths = ["src"]

# Glob patterns for files to skip.
exclude = ["vendor/**", "**/*Test.php"]

# Report missing @param / @return tags.
report_missing = false

# Output format: "pretty", "json", or "github".
format = "pretty"

[cache]
enabled = true
# file = ".phpdoc-lint.cache"
# Change detection: "hash", "mtime", or "none".
mode = "hash"
"#
}
