//! Functions taking too many parameters.

use crate::ast::NodeType;
use crate::findings::Finding;
use crate::visit::{handler, Registry};

use super::Rule;

pub const DEFAULT_MAX_PARAMS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct TooManyParams {
    max: usize,
}

impl TooManyParams {
    pub const TAG: &'static str = "TooManyParams";

    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Default for TooManyParams {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PARAMS)
    }
}

impl Rule for TooManyParams {
    fn name(&self) -> &'static str {
        "too_many_params"
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn description(&self) -> String {
        format!("function with more than {} parameters", self.max)
    }

    fn install(&self, registry: &mut Registry) {
        let max = self.max;
        for ty in NodeType::FUNCTIONS {
            registry.chain(
                ty,
                handler(move |_, node, _, sink| {
                    let count = node.params().map_or(0, |p| p.len());
                    if count > max {
                        sink.push(Finding::tagged(node, Self::TAG).with_description(format!(
                            "{} parameters, at most {} allowed",
                            count, max
                        )));
                    }
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::languages::javascript;
    use crate::visit::Engine;

    #[test]
    fn test_flags_wide_functions_only() {
        let source = "function a(x, y, z, w) {}\nconst b = (x) => x;\n";
        let tree = javascript::new_parser().parse(source).unwrap();
        let mut registry = Registry::builtin();
        TooManyParams::default().install(&mut registry);

        let findings = Engine::new(registry).run(&tree);
        assert_eq!(findings.len(), 1);
        let finding = &findings.as_slice()[0];
        assert_eq!(finding.tag(), "TooManyParams");
        assert_eq!(
            finding.description(),
            Some("4 parameters, at most 3 allowed")
        );
    }
}
