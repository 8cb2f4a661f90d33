//! Declaring and compiling route tables.

mod pattern;
mod route;
mod tree;

pub use pattern::PatternSegment;
pub use route::*;
pub use tree::*;
