//! Source scanning frontend
//!
//! Everything the core engine treats as host-provided lives here: parsing
//! Go source with tree-sitter and extracting the per-file symbol table
//! the classifier resolves callees against.

pub mod tree_sitter_go;

pub use tree_sitter_go::GoTreeSitterAnalyzer;
