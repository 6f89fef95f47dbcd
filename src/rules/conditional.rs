//! Ternaries nested inside ternaries.

use crate::ast::{NodeKind, NodeType};
use crate::findings::Finding;
use crate::visit::{handler, Registry};

use super::{scan_body, Rule};

#[derive(Debug, Clone, Copy, Default)]
pub struct NestedConditional;

impl NestedConditional {
    pub const TAG: &'static str = "NestedConditional";
}

impl Rule for NestedConditional {
    fn name(&self) -> &'static str {
        "nested_conditional"
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn description(&self) -> String {
        "conditional expression containing another conditional".to_string()
    }

    fn install(&self, registry: &mut Registry) {
        registry.chain(
            NodeType::ConditionalExpression,
            handler(|_, node, _, sink| {
                let mut nested = 0;
                scan_body(node, &mut |n| {
                    if matches!(n.kind, NodeKind::ConditionalExpression { .. }) {
                        nested += 1;
                    }
                });
                if nested > 0 {
                    sink.push(
                        Finding::tagged(node, Self::TAG)
                            .with_description(format!("{} nested conditional(s)", nested)),
                    );
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::languages::javascript;
    use crate::visit::Engine;

    fn count(source: &str) -> usize {
        let tree = javascript::new_parser().parse(source).unwrap();
        let mut registry = Registry::builtin();
        NestedConditional.install(&mut registry);
        let findings = Engine::new(registry).run(&tree);
        findings.with_tag(NestedConditional::TAG).count()
    }

    #[test]
    fn test_nested_ternary() {
        assert_eq!(count("const v = a ? (b ? 1 : 2) : 3;"), 1);
        assert_eq!(count("const v = a ? 1 : 2;"), 0);
    }

    #[test]
    fn test_ternary_inside_callback_is_separate() {
        assert_eq!(count("const v = a ? xs.map((x) => x ? 1 : 0) : [];"), 0);
    }
}
