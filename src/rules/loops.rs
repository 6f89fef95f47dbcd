//! Imperative loop statements.
//!
//! Loops are registered as no-op extension points by default. This rule
//! reports them and then continues into the loop body, which the default
//! registry never does.

use crate::ast::{NodeKind, NodeType};
use crate::findings::Finding;
use crate::visit::{handler, Registry};

use super::Rule;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImperativeLoop;

impl ImperativeLoop {
    pub const TAG: &'static str = "ImperativeLoop";
}

impl Rule for ImperativeLoop {
    fn name(&self) -> &'static str {
        "imperative_loop"
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn description(&self) -> String {
        "loop statement where an array method may fit".to_string()
    }

    fn install(&self, registry: &mut Registry) {
        for ty in NodeType::LOOPS {
            registry.chain(
                ty,
                handler(|engine, node, _, sink| {
                    sink.push(
                        Finding::tagged(node, Self::TAG)
                            .with_description(format!("{} loop", keyword(&node.kind))),
                    );
                    match &node.kind {
                        NodeKind::ForStatement { body, .. }
                        | NodeKind::ForInStatement { body, .. }
                        | NodeKind::ForOfStatement { body, .. }
                        | NodeKind::WhileStatement { body, .. }
                        | NodeKind::DoWhileStatement { body, .. } => {
                            engine.visit(body, Some(node), sink)
                        }
                        _ => {}
                    }
                }),
            );
        }
    }
}

fn keyword(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::ForStatement { .. } => "for",
        NodeKind::ForInStatement { .. } => "for...in",
        NodeKind::ForOfStatement { .. } => "for...of",
        NodeKind::WhileStatement { .. } => "while",
        NodeKind::DoWhileStatement { .. } => "do...while",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::languages::javascript;
    use crate::rules::TooManyReturns;
    use crate::visit::Engine;

    #[test]
    fn test_loops_are_reported_and_entered() {
        let source = r#"
for (let i = 0; i < n; i++) {
    while (busy) {
        const f = function () { if (a) { return 1; } return 2; };
    }
}
"#;
        let tree = javascript::new_parser().parse(source).unwrap();
        let mut registry = Registry::builtin();
        ImperativeLoop.install(&mut registry);
        TooManyReturns::default().install(&mut registry);

        let findings = Engine::new(registry).run(&tree);
        let tags: Vec<_> = findings.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec!["ImperativeLoop", "ImperativeLoop", "TooManyReturns"]);
        assert_eq!(findings.as_slice()[1].description(), Some("while loop"));
    }
}
