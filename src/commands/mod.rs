//! CLI command implementations.
//!
//! - **check**: validate docblocks and print a report
//! - **fix**: rewrite docblocks for the mechanical issue kinds
//! - **init**: write a starter config file

pub mod check;
pub mod fix;
pub mod init;

pub use check::{check, CheckConfig};
pub use fix::{fix, FixConfig};
pub use init::init_config;

/// No issues found.
pub const EXIT_SUCCESS: i32 = 0;
/// Validation finished and found issues.
pub const EXIT_ISSUES_FOUND: i32 = 1;
/// The run itself failed.
pub const EXIT_ERROR: i32 = 2;
