//! Functions with more return statements than allowed.

use crate::ast::{Node, NodeKind, NodeType};
use crate::findings::Finding;
use crate::visit::{handler, Registry};

use super::{scan_body, Rule};

pub const DEFAULT_MAX_RETURNS: usize = 1;

/// Flags a function whose own body holds more than `max` return statements.
#[derive(Debug, Clone, Copy)]
pub struct TooManyReturns {
    max: usize,
}

impl TooManyReturns {
    pub const TAG: &'static str = "TooManyReturns";

    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Default for TooManyReturns {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETURNS)
    }
}

impl Rule for TooManyReturns {
    fn name(&self) -> &'static str {
        "too_many_returns"
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn description(&self) -> String {
        format!("function with more than {} return statement(s)", self.max)
    }

    fn install(&self, registry: &mut Registry) {
        let max = self.max;
        for ty in NodeType::FUNCTIONS {
            registry.chain(
                ty,
                handler(move |_, node, _, sink| {
                    let count = count_returns(node);
                    if count > max {
                        sink.push(
                            Finding::tagged(node, Self::TAG).with_description(format!(
                                "{} return statements, at most {} allowed",
                                count, max
                            )),
                        );
                    }
                }),
            );
        }
    }
}

/// Return statements belonging to `function` itself.
pub fn count_returns(function: &Node) -> usize {
    let mut count = 0;
    scan_body(function, &mut |n| {
        if matches!(n.kind, NodeKind::ReturnStatement { .. }) {
            count += 1;
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::languages::javascript;
    use crate::visit::Engine;

    fn findings_for(source: &str, max: usize) -> Vec<(String, usize)> {
        let tree = javascript::new_parser().parse(source).unwrap();
        let mut registry = Registry::builtin();
        TooManyReturns::new(max).install(&mut registry);
        let engine = Engine::new(registry);
        engine
            .run(&tree)
            .iter()
            .map(|f| (f.tag().to_string(), f.span().start_line))
            .collect()
    }

    #[test]
    fn test_flags_function_with_three_returns() {
        let source = r#"
function sign(x) {
    if (x > 0) { return 1; }
    if (x < 0) { return -1; }
    return 0;
}
"#;
        assert_eq!(findings_for(source, 1), vec![("TooManyReturns".to_string(), 2)]);
        assert!(findings_for(source, 3).is_empty());
    }

    #[test]
    fn test_nested_functions_count_separately() {
        let source = r#"
function outer() {
    const inner = () => { if (a) { return 1; } return 2; };
    return inner;
}
"#;
        // Only the arrow function exceeds the limit.
        assert_eq!(findings_for(source, 1), vec![("TooManyReturns".to_string(), 3)]);
    }

    #[test]
    fn test_count_returns_ignores_nested() {
        let tree = javascript::new_parser()
            .parse("function f() { function g() { return 1; } return g; }")
            .unwrap();
        let NodeKind::Program { body, .. } = &tree.kind else {
            panic!("expected program");
        };
        assert_eq!(count_returns(&body[0]), 1);
    }
}
