//! Stock pattern rules.
//!
//! Each rule installs its handlers into a [`Registry`] through
//! [`Registry::chain`], so its detection runs first and the structural
//! default (or another rule on the same kind) runs after it.

mod conditional;
mod loops;
mod params;
mod returns;

pub use conditional::NestedConditional;
pub use loops::ImperativeLoop;
pub use params::TooManyParams;
pub use returns::TooManyReturns;

use crate::ast::Node;
use crate::config::RulesConfig;
use crate::visit::Registry;

/// A detection rule that can be installed into a registry.
pub trait Rule: Send + Sync {
    /// Configuration key, e.g. `too_many_returns`.
    fn name(&self) -> &'static str;

    /// Tag carried by the findings this rule produces.
    fn tag(&self) -> &'static str;

    /// One-line human description.
    fn description(&self) -> String;

    /// Add this rule's handlers to `registry`.
    fn install(&self, registry: &mut Registry);
}

/// Every stock rule with its default settings, in a stable order.
pub fn catalog() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(TooManyReturns::default()),
        Box::new(TooManyParams::default()),
        Box::new(NestedConditional),
        Box::new(ImperativeLoop),
    ]
}

/// The rules enabled by `config`.
pub fn from_config(config: &RulesConfig) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();

    if config.too_many_returns.enabled {
        let max = config
            .too_many_returns
            .max
            .unwrap_or(returns::DEFAULT_MAX_RETURNS);
        rules.push(Box::new(TooManyReturns::new(max)));
    }
    if config.too_many_params.enabled {
        let max = config
            .too_many_params
            .max
            .unwrap_or(params::DEFAULT_MAX_PARAMS);
        rules.push(Box::new(TooManyParams::new(max)));
    }
    if config.nested_conditional.enabled {
        rules.push(Box::new(NestedConditional));
    }
    if config.imperative_loop.enabled {
        rules.push(Box::new(ImperativeLoop));
    }

    rules
}

/// The structural defaults with `rules` installed on top.
pub fn registry(rules: &[Box<dyn Rule>]) -> Registry {
    let mut registry = Registry::builtin();
    for rule in rules {
        tracing::debug!(rule = rule.name(), "installing rule");
        rule.install(&mut registry);
    }
    registry
}

/// Visit every descendant of `node` without entering nested functions.
///
/// Class methods lower to `Other` nodes and count as functions here.
pub(crate) fn scan_body<'a>(node: &'a Node, f: &mut impl FnMut(&'a Node)) {
    for child in node.children() {
        if child.is_function() || child.kind_name() == "method_definition" {
            continue;
        }
        f(child);
        scan_body(child, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;
    use crate::config::RulesConfig;

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = catalog().iter().map(|r| r.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_from_config_defaults() {
        let rules = from_config(&RulesConfig::default());
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["too_many_returns", "too_many_params", "nested_conditional"]
        );
    }

    #[test]
    fn test_from_config_respects_enabled() {
        let mut config = RulesConfig::default();
        config.too_many_returns.enabled = false;
        config.imperative_loop.enabled = true;
        let names: Vec<_> = from_config(&config).iter().map(|r| r.name()).collect();
        assert!(!names.contains(&"too_many_returns"));
        assert!(names.contains(&"imperative_loop"));
    }

    #[test]
    fn test_registry_keeps_structural_kinds() {
        let registry = registry(&catalog());
        for ty in NodeType::FUNCTIONS {
            assert!(registry.contains(ty));
        }
        assert!(registry.contains(NodeType::Program));
    }
}
