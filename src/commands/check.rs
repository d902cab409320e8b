//! The `check` command: scan, validate, render a report.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use crate::cache::{CacheMode, CacheSignature, ValidationCache, DEFAULT_CACHE_FILE};
use crate::commands::{EXIT_ISSUES_FOUND, EXIT_SUCCESS};
use crate::config::Config;
use crate::engine::Linter;
use crate::io::{create_writer, OutputFormat};

pub struct CheckConfig {
    pub paths: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub missing: bool,
    pub no_color: bool,
    pub no_parallel: bool,
    pub no_cache: bool,
    pub clear_cache: bool,
    pub cache_file: Option<PathBuf>,
    pub cache_mode: Option<CacheMode>,
}

/// Run validation and print the report. Returns the process exit code.
pub fn check(args: CheckConfig, config: &Config) -> Result<i32> {
    let cache_mode = resolve_cache_mode(&args, config);

    let paths = resolve_paths(args.paths, config)?;

    if args.no_color {
        colored::control::set_override(false);
    }

    let report_missing = args.missing || config.report_missing;
    let format = args.format.or(config.format).unwrap_or_default();

    let mut exclude = args.exclude;
    exclude.extend(config.exclude.iter().cloned());

    let mut linter = Linter::new();
    linter.set_exclude_patterns(&exclude)?;
    linter.set_report_missing(report_missing);
    linter.set_parallel(!args.no_parallel);
    if cache_mode.is_enabled() {
        let cache_file = args
            .cache_file
            .or_else(|| config.cache.file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE));

        let signature = CacheSignature::new(report_missing, cache_mode);
        let mut cache = ValidationCache::load(cache_file, signature);
        if args.clear_cache {
            cache.clear();
        }
        linter.set_cache(cache);
    }

    let report = linter.validate(&paths)?;

    let base_path = resolve_base_path(&paths);
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    create_writer(writer, format, base_path).write_report(&report)?;

    Ok(if report.is_clean() {
        EXIT_SUCCESS
    } else {
        EXIT_ISSUES_FOUND
    })
}

/// CLI paths win over config paths; both fall back to the current directory.
/// Naming a path that does not exist is an error, not an empty scan.
pub fn resolve_paths(cli_paths: Vec<PathBuf>, config: &Config) -> Result<Vec<PathBuf>> {
    let paths = if !cli_paths.is_empty() {
        cli_paths
    } else if !config.paths.is_empty() {
        config.paths.clone()
    } else {
        vec![std::env::current_dir().context("Could not determine current working directory")?]
    };

    for path in &paths {
        if !path.exists() {
            bail!("Path does not exist: {}", path.display());
        }
    }

    Ok(paths)
}

fn resolve_cache_mode(args: &CheckConfig, config: &Config) -> CacheMode {
    if args.no_cache || !config.cache.enabled {
        return CacheMode::None;
    }
    args.cache_mode.unwrap_or(config.cache.mode)
}

/// Base directory for relative path display: the single scanned directory,
/// or the working directory for multi-path runs.
fn resolve_base_path(paths: &[PathBuf]) -> Option<PathBuf> {
    match paths {
        [only] if only.is_dir() => std::fs::canonicalize(only).ok(),
        _ => std::env::current_dir().ok(),
    }
}
