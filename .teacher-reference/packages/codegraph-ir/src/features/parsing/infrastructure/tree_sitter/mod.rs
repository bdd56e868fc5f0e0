//! Tree-sitter based parser implementation

pub mod languages;
mod parser;

pub use parser::TreeSitterParser;
