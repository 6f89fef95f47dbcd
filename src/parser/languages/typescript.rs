//! TypeScript language configuration for tree-sitter parsing.
//!
//! Type annotations are not part of the node model: they lower to `Other`
//! or are dropped where a wrapper exists only to carry them.

use crate::parser::treesitter::{Config, TreeSitterParser};
use crate::parser::Parser;

/// Create a new TypeScript parser.
pub fn new_parser() -> Box<dyn Parser> {
    Box::new(TreeSitterParser::new(Config {
        language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        language_name: "typescript",
    }))
}

/// Create a new TSX parser.
pub fn new_tsx_parser() -> Box<dyn Parser> {
    Box::new(TreeSitterParser::new(Config {
        language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        language_name: "tsx",
    }))
}

/// Register TypeScript parsers for .ts and .tsx extensions.
pub fn register() {
    crate::parser::insert(".ts", new_parser);
    crate::parser::insert(".tsx", new_tsx_parser);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, NodeType};

    #[test]
    fn test_typescript_function() {
        let parser = new_parser();
        let source = r#"
function check(a: number, b: number): number {
    if (a > b) {
        return a;
    }
    return b;
}
"#;

        let program = parser.parse(source).unwrap();
        let NodeKind::Program { body, .. } = &program.kind else {
            panic!("expected program");
        };
        assert_eq!(body[0].node_type(), NodeType::FunctionDeclaration);
        assert_eq!(body[0].params().map(|p| p.len()), Some(2));
    }

    #[test]
    fn test_typescript_declarations_become_other() {
        let parser = new_parser();
        let program = parser.parse("interface Point { x: number; }").unwrap();
        let NodeKind::Program { body, .. } = &program.kind else {
            panic!("expected program");
        };
        assert_eq!(body[0].kind_name(), "interface_declaration");
    }

    #[test]
    fn test_tsx_language_name() {
        assert_eq!(new_tsx_parser().language(), "tsx");
    }
}
