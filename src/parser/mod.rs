//! Parser collaborator: source text in, [`Node`] tree out.
//!
//! This module provides:
//! - `Parser` trait: Abstract interface for language parsers
//! - Extension registry: factory-based parser lookup by file extension
//! - Tree-sitter implementations for JavaScript and TypeScript

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::ast::Node;

mod lower;
pub mod languages;
pub mod treesitter;

pub use lower::MAX_DEPTH;

/// Why a source text could not be turned into a tree.
///
/// The analysis pipeline logs these and reports a single generic failure.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("loading grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("parser produced no tree")]
    NoTree,
    #[error("syntax error at {line}:{column} near {kind}")]
    Syntax {
        line: usize,
        column: usize,
        kind: String,
    },
    #[error("nesting deeper than {limit} levels at line {line}")]
    TooDeep { line: usize, limit: usize },
    #[error("malformed {kind}: missing {field}")]
    Malformed { kind: String, field: &'static str },
}

/// Parser trait for producing syntax trees.
pub trait Parser: Send + Sync {
    /// Parse source text into a `Program` node.
    ///
    /// Comments and line/column spans are retained.
    fn parse(&self, source: &str) -> Result<Node, ParseError>;

    /// Return the language this parser handles (e.g., "javascript").
    fn language(&self) -> &str;
}

/// Factory function type for creating parser instances.
pub type ParserFactory = fn() -> Box<dyn Parser>;

lazy_static::lazy_static! {
    /// Global parser registry mapping file extensions to parser factories.
    static ref REGISTRY: RwLock<HashMap<String, ParserFactory>> = RwLock::new(HashMap::new());
}

/// Register a parser factory for a file extension.
/// Extension should include the dot (e.g., ".js", ".ts").
/// Built-in parsers are installed first, so this overrides them.
pub fn register(ext: &str, factory: ParserFactory) {
    init();
    insert(ext, factory);
}

pub(crate) fn insert(ext: &str, factory: ParserFactory) {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    registry.insert(ext.to_string(), factory);
}

/// Get a parser for the given file extension.
/// Returns None if no parser is registered for the extension.
pub fn for_extension(ext: &str) -> Option<Box<dyn Parser>> {
    init();
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.get(ext).map(|factory| factory())
}

/// Return all registered file extensions, sorted.
pub fn supported_extensions() -> Vec<String> {
    init();
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let mut exts: Vec<String> = registry.keys().cloned().collect();
    exts.sort();
    exts
}

/// Install the built-in language parsers. Runs once per process; lookups
/// and registrations call it themselves.
pub fn init() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(languages::register_all);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Span};

    struct MockParser;

    impl Parser for MockParser {
        fn parse(&self, _source: &str) -> Result<Node, ParseError> {
            Ok(Node::new(
                NodeKind::Program {
                    body: vec![],
                    comments: vec![],
                },
                Span::default(),
            ))
        }

        fn language(&self) -> &str {
            "mock"
        }
    }

    fn mock_factory() -> Box<dyn Parser> {
        Box::new(MockParser)
    }

    #[test]
    fn test_registry() {
        register(".mock", mock_factory);

        let parser = for_extension(".mock");
        assert!(parser.is_some());

        let parser = parser.unwrap();
        assert_eq!(parser.language(), "mock");
        assert!(parser.parse("anything").is_ok());
        assert!(supported_extensions().contains(&".mock".to_string()));
    }

    #[test]
    fn test_unregistered_extension() {
        let parser = for_extension(".unknown");
        assert!(parser.is_none());
    }

    #[test]
    fn test_builtins_available_without_init() {
        let parser = for_extension(".ts").expect("typescript parser");
        assert_eq!(parser.language(), "typescript");
    }

    #[test]
    fn test_register_overrides_builtin() {
        let language = || for_extension(".cjs").map(|p| p.language().to_string());
        register(".cjs", mock_factory);
        assert_eq!(language().as_deref(), Some("mock"));
        init();
        assert_eq!(language().as_deref(), Some("mock"));
    }

    #[test]
    fn test_init_registers_javascript() {
        init();
        init();
        for ext in [".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx"] {
            assert!(for_extension(ext).is_some(), "missing parser for {}", ext);
        }
    }
}
