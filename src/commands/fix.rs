//! The `fix` command: rewrite docblocks in place.

use anyhow::Result;
use std::path::PathBuf;

use crate::commands::check::resolve_paths;
use crate::commands::EXIT_SUCCESS;
use crate::config::Config;
use crate::core::IssueKind;
use crate::engine::Linter;
use crate::fixer::DocBlockFixer;

pub struct FixConfig {
    pub paths: Vec<PathBuf>,
    pub fix_missing: bool,
    pub exclude: Vec<String>,
    pub dry_run: bool,
}

/// Find fixable issues and apply them. Returns the process exit code.
pub fn fix(args: FixConfig, config: &Config) -> Result<i32> {
    let paths = resolve_paths(args.paths, config)?;

    let mut exclude = args.exclude;
    exclude.extend(config.exclude.iter().cloned());

    let mut linter = Linter::new();
    linter.set_exclude_patterns(&exclude)?;
    // Missing tags must be detected before they can be generated
    linter.set_report_missing(args.fix_missing || config.report_missing);

    let fixer = DocBlockFixer::new(args.fix_missing);
    let mut fixed_files = 0usize;
    let mut fix_count = 0usize;

    for file in linter.collect_files(&paths) {
        let methods = linter.collect_method_issues(&file)?;
        if methods.is_empty() {
            continue;
        }

        let fixed = if args.dry_run {
            count_fixable(&methods, args.fix_missing)
        } else {
            fixer.fix_file(&file, &methods)?
        };

        if fixed > 0 {
            fixed_files += 1;
            fix_count += fixed;
            log::info!("{}: {fixed} fix(es)", file.display());
        }
    }

    if args.dry_run {
        println!("Would apply {fix_count} fix(es) in {fixed_files} file(s)");
    } else {
        println!("Applied {fix_count} fix(es) in {fixed_files} file(s)");
    }

    Ok(EXIT_SUCCESS)
}

fn count_fixable(
    methods: &[(crate::core::MethodInfo, Vec<crate::core::Issue>)],
    fix_missing: bool,
) -> usize {
    methods
        .iter()
        .flat_map(|(_, issues)| issues)
        .filter(|issue| match issue.kind {
            IssueKind::ParamOrder => true,
            kind if kind.is_missing() => fix_missing,
            _ => false,
        })
        .count()
}
