//! Language-specific tree-sitter configurations.
//!
//! Each language module provides a factory for creating parsers and a
//! `register` function binding it to its file extensions.

pub mod javascript;
pub mod typescript;

/// Register all available language parsers.
pub fn register_all() {
    javascript::register();
    typescript::register();
}
