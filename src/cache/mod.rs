//! Incremental validation cache.
//!
//! Stores per-file results keyed by a change-detection key (content hash or
//! mtime) plus a run signature. When the signature no longer matches (tool
//! upgrade, different flags, different mode) the whole cache is discarded.
//! A corrupt or unreadable cache file is treated as empty, never as an error.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::core::errors::Result;
use crate::core::{FileReport, MethodIssues};

pub const DEFAULT_CACHE_FILE: &str = ".phpdoc-lint.cache";

const CACHE_VERSION: u32 = 1;

/// How file changes are detected between runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// SHA-256 content hash. Reliable, reads every file.
    #[default]
    Hash,
    /// Modification time. Faster, can miss changes after git checkouts.
    Mtime,
    /// No caching.
    None,
}

impl CacheMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CacheMode::None)
    }

    /// Change-detection key for a file, or `None` when the file is
    /// unreadable or caching is disabled.
    pub fn file_key(&self, path: &Path) -> Option<String> {
        match self {
            CacheMode::Hash => {
                let content = fs::read(path).ok()?;
                Some(format!("{:x}", Sha256::digest(&content)))
            }
            CacheMode::Mtime => {
                let mtime = fs::metadata(path).ok()?.modified().ok()?;
                let since_epoch = mtime.duration_since(UNIX_EPOCH).ok()?;
                Some(format!("{}.{}", since_epoch.as_secs(), since_epoch.subsec_nanos()))
            }
            CacheMode::None => None,
        }
    }
}

/// Run configuration that affects cached results. Any difference from the
/// stored signature invalidates the entire cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSignature {
    cache_version: u32,
    validator_version: String,
    report_missing: bool,
    mode: CacheMode,
}

impl CacheSignature {
    pub fn new(report_missing: bool, mode: CacheMode) -> Self {
        Self {
            cache_version: CACHE_VERSION,
            validator_version: env!("CARGO_PKG_VERSION").to_string(),
            report_missing,
            mode,
        }
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    fn matches(&self, other: &CacheSignature) -> bool {
        self == other
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CachedFile {
    key: String,
    methods: Vec<MethodIssues>,
}

#[derive(Serialize, Deserialize)]
struct CacheData {
    signature: CacheSignature,
    files: HashMap<PathBuf, CachedFile>,
}

pub struct ValidationCache {
    cache_file: PathBuf,
    signature: CacheSignature,
    mode: CacheMode,
    files: HashMap<PathBuf, CachedFile>,
    dirty: bool,
}

impl ValidationCache {
    /// Load the cache from disk. Missing, unreadable, corrupt, or
    /// signature-mismatched cache files all start an empty cache.
    pub fn load(cache_file: impl Into<PathBuf>, signature: CacheSignature) -> Self {
        let cache_file = cache_file.into();
        let mode = signature.mode();

        let files = fs::read_to_string(&cache_file)
            .ok()
            .and_then(|content| serde_json::from_str::<CacheData>(&content).ok())
            .filter(|data| signature.matches(&data.signature))
            .map(|data| data.files)
            .unwrap_or_default();

        Self {
            cache_file,
            signature,
            mode,
            files,
            dirty: false,
        }
    }

    /// Whether a file must be re-validated (unknown, changed, or caching off).
    pub fn needs_validation(&self, path: &Path) -> bool {
        if !self.mode.is_enabled() {
            return true;
        }

        let Some(entry) = self.files.get(&normalize_path(path)) else {
            return true;
        };

        match self.mode.file_key(path) {
            Some(key) => entry.key != key,
            None => true,
        }
    }

    /// Rebuild a [`FileReport`] from the cached results for a file.
    pub fn get(&self, path: &Path) -> Option<FileReport> {
        if !self.mode.is_enabled() {
            return None;
        }

        let entry = self.files.get(&normalize_path(path))?;

        let mut report = FileReport::new(path);
        report.methods = entry.methods.clone();
        Some(report)
    }

    pub fn set(&mut self, path: &Path, report: &FileReport) {
        if !self.mode.is_enabled() {
            return;
        }

        let Some(key) = self.mode.file_key(path) else {
            return;
        };

        self.files.insert(
            normalize_path(path),
            CachedFile {
                key,
                methods: report.methods.clone(),
            },
        );
        self.dirty = true;
    }

    /// Drop all cached data and remove the cache file.
    pub fn clear(&mut self) {
        self.files.clear();
        self.dirty = true;

        if self.cache_file.exists() {
            let _ = fs::remove_file(&self.cache_file);
        }
    }

    /// Write the cache to disk if anything changed this run.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let data = CacheData {
            signature: self.signature.clone(),
            files: self.files.clone(),
        };

        fs::write(&self.cache_file, serde_json::to_string_pretty(&data)?)?;
        self.dirty = false;
        Ok(())
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
