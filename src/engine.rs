//! Run orchestration.
//!
//! Walks the requested paths for PHP files, validates each one, and folds
//! the results into a [`Report`]. Files are independent, so validation runs
//! on the rayon pool unless parallelism is disabled; result order always
//! follows discovery order.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::ValidationCache;
use crate::core::errors::Result;
use crate::core::{FileReport, Issue, MethodInfo, Report};
use crate::parsers::PhpParser;
use crate::validator::MethodValidator;

pub struct Linter {
    exclude_patterns: Vec<glob::Pattern>,
    report_missing: bool,
    parallel: bool,
    cache: Option<ValidationCache>,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    pub fn new() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            report_missing: false,
            parallel: true,
            cache: None,
        }
    }

    pub fn set_exclude_patterns(&mut self, patterns: &[String]) -> Result<()> {
        self.exclude_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(())
    }

    pub fn set_report_missing(&mut self, report: bool) {
        self.report_missing = report;
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn set_cache(&mut self, cache: ValidationCache) {
        self.cache = Some(cache);
    }

    /// Validate every PHP file under the given paths.
    pub fn validate(&mut self, paths: &[PathBuf]) -> Result<Report> {
        let files = self.collect_files(paths);

        // Resolve cache hits first so only stale files hit the parser pool
        let mut pending: Vec<PathBuf> = Vec::new();
        let mut resolved: Vec<(usize, FileReport)> = Vec::new();
        let mut pending_slots: Vec<usize> = Vec::new();

        for (index, file) in files.iter().enumerate() {
            match self.cached_report(file) {
                Some(report) => resolved.push((index, report)),
                None => {
                    pending_slots.push(index);
                    pending.push(file.clone());
                }
            }
        }

        let report_missing = self.report_missing;
        let fresh: Vec<FileReport> = if self.parallel {
            pending
                .par_iter()
                .map(|file| validate_file(file, report_missing))
                .collect()
        } else {
            pending
                .iter()
                .map(|file| validate_file(file, report_missing))
                .collect()
        };

        for (slot, file_report) in pending_slots.iter().zip(&fresh) {
            if let Some(cache) = &mut self.cache {
                cache.set(&files[*slot], file_report);
            }
            resolved.push((*slot, file_report.clone()));
        }
        resolved.sort_by_key(|(index, _)| *index);

        let mut report = Report::new();
        for (_, file_report) in resolved {
            report.add_file_report(file_report);
        }

        if let Some(cache) = &mut self.cache {
            cache.save()?;
        }

        Ok(report)
    }

    /// Validate in-memory PHP source, for callers that own file handling.
    pub fn validate_content(&self, content: &str, path: &Path) -> FileReport {
        validate_content(content, path, self.report_missing)
    }

    /// Per-method issues for one file, with full signature data attached.
    /// The auto-fixer needs parameter types, which a [`FileReport`] drops.
    pub fn collect_method_issues(&self, path: &Path) -> Result<Vec<(MethodInfo, Vec<Issue>)>> {
        let content = fs::read_to_string(path)?;

        let mut parser = match PhpParser::new() {
            Ok(parser) => parser,
            Err(_) => return Ok(Vec::new()),
        };
        let Ok(methods) = parser.extract_methods(&content) else {
            return Ok(Vec::new());
        };

        let mut validator = MethodValidator::new();
        Ok(methods
            .into_iter()
            .map(|method| {
                let issues = validator.validate(&method, self.report_missing);
                (method, issues)
            })
            .filter(|(_, issues)| !issues.is_empty())
            .collect())
    }

    /// Expand files and directories into the ordered list of PHP files to
    /// validate, honoring exclude patterns.
    pub fn collect_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                for entry in WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                {
                    let entry_path = entry.path();
                    if entry_path.extension().is_some_and(|ext| ext == "php")
                        && !self.is_excluded(entry_path)
                    {
                        files.push(entry_path.to_path_buf());
                    }
                }
            }
        }

        files
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_patterns.iter().any(|pattern| {
            pattern.matches_path(path)
                || path
                    .file_name()
                    .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
        })
    }

    fn cached_report(&self, path: &Path) -> Option<FileReport> {
        let cache = self.cache.as_ref()?;
        if cache.needs_validation(path) {
            return None;
        }
        cache.get(path)
    }
}

fn validate_file(path: &Path, report_missing: bool) -> FileReport {
    let Ok(content) = fs::read_to_string(path) else {
        return FileReport::with_parse_error(
            path,
            format!("Could not read file: {}", path.display()),
        );
    };

    validate_content(&content, path, report_missing)
}

fn validate_content(content: &str, path: &Path, report_missing: bool) -> FileReport {
    let mut parser = match PhpParser::new() {
        Ok(parser) => parser,
        Err(e) => return FileReport::with_parse_error(path, e.to_string()),
    };

    let methods = match parser.extract_methods(content) {
        Ok(methods) => methods,
        Err(e) => return FileReport::with_parse_error(path, e.to_string()),
    };

    let mut validator = MethodValidator::new();
    let mut file_report = FileReport::new(path);

    for method in &methods {
        let issues = validator.validate(method, report_missing);
        file_report.add_method_issues(method, issues);
    }

    file_report
}
