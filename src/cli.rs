use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cache::CacheMode;
use crate::io::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "phpdoc-lint")]
#[command(about = "Validates PHPDoc @param and @return tags against method signatures", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check PHPDoc annotations and report issues
    Check {
        /// Directories or files to scan (defaults to config paths, then the current directory)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns to exclude from scanning
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Also report parameters and returns missing documentation
        #[arg(short, long)]
        missing: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Validate files sequentially instead of in parallel
        #[arg(long)]
        no_parallel: bool,

        /// Disable result caching
        #[arg(long)]
        no_cache: bool,

        /// Clear the cache before running
        #[arg(long)]
        clear_cache: bool,

        /// Path to the cache file
        #[arg(long)]
        cache_file: Option<PathBuf>,

        /// Cache invalidation mode
        #[arg(long, value_enum)]
        cache_mode: Option<CacheMode>,
    },

    /// Rewrite docblocks to fix mechanical issues
    Fix {
        /// Directories or files to fix (defaults to config paths, then the current directory)
        paths: Vec<PathBuf>,

        /// Also generate missing @param / @return tags
        #[arg(long)]
        fix_missing: bool,

        /// Glob patterns to exclude from scanning
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Report which fixes would be applied without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a starter .phpdoc-lint.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
