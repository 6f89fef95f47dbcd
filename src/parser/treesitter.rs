//! Tree-sitter based parser implementation.
//!
//! This module provides a generic tree-sitter parser that can be configured
//! for different grammars. The concrete syntax tree is lowered into the
//! [`Node`] model before it leaves this module.

use tree_sitter::{Language, Parser as TsParser};

use super::lower::Lowerer;
use super::{ParseError, Parser};
use crate::ast::Node;

/// Configuration for a tree-sitter language parser.
#[derive(Clone)]
pub struct Config {
    /// The tree-sitter language
    pub language: Language,
    /// Language name (e.g., "javascript", "typescript")
    pub language_name: &'static str,
}

/// Tree-sitter based parser.
pub struct TreeSitterParser {
    config: Config,
}

impl TreeSitterParser {
    /// Create a new tree-sitter parser with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse source code and return the raw tree.
    fn parse_tree(&self, source: &str) -> Result<tree_sitter::Tree, ParseError> {
        let mut parser = TsParser::new();
        parser.set_language(&self.config.language)?;
        parser.parse(source, None).ok_or(ParseError::NoTree)
    }
}

impl Parser for TreeSitterParser {
    fn parse(&self, source: &str) -> Result<Node, ParseError> {
        let tree = self.parse_tree(source)?;
        let root = tree.root_node();

        if let Some(bad) = first_error(root) {
            let at = bad.start_position();
            return Err(ParseError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
                kind: if bad.is_missing() {
                    format!("missing {}", bad.kind())
                } else {
                    bad.kind().to_string()
                },
            });
        }

        Lowerer::new(source.as_bytes()).program(root)
    }

    fn language(&self) -> &str {
        self.config.language_name
    }
}

/// The first ERROR or MISSING node in document order.
///
/// Walks with a cursor so arbitrarily deep trees need no stack.
fn first_error(root: tree_sitter::Node) -> Option<tree_sitter::Node> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
