pub mod docblock;
pub mod php;

pub use docblock::{DocBlock, DocBlockParser};
pub use php::PhpParser;
