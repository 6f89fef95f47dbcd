//! JavaScript language configuration for tree-sitter parsing.

use crate::parser::treesitter::{Config, TreeSitterParser};
use crate::parser::Parser;

/// Create a new JavaScript parser.
pub fn new_parser() -> Box<dyn Parser> {
    Box::new(TreeSitterParser::new(Config {
        language: tree_sitter_javascript::LANGUAGE.into(),
        language_name: "javascript",
    }))
}

/// Register JavaScript parser for .js, .jsx, .mjs and .cjs extensions.
pub fn register() {
    crate::parser::insert(".js", new_parser);
    crate::parser::insert(".jsx", new_parser);
    crate::parser::insert(".mjs", new_parser);
    crate::parser::insert(".cjs", new_parser);
}
