//! PHPDoc annotation linter.
//!
//! Validates that `@param` and `@return` tags match the actual PHP method
//! signatures, with a syntactic type-compatibility engine that understands
//! the richer PHPDoc type syntax (unions, generics, literals, shapes).

pub mod cache;
pub mod cli;
pub mod commands;
pub mod comparator;
pub mod config;
pub mod core;
pub mod engine;
pub mod fixer;
pub mod io;
pub mod parsers;
pub mod validator;

pub use comparator::{are_compatible, normalize};
pub use crate::core::{FileReport, Issue, IssueKind, MethodInfo, Report};
pub use engine::Linter;
pub use validator::MethodValidator;
