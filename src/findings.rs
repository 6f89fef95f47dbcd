//! Core types for traversal results.

use crate::ast::{Node, Span};

/// A detected pattern instance.
///
/// A finding borrows the node it points at, so it can never outlive the
/// tree the caller parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding<'t> {
    node: &'t Node,
    tag: String,
    description: Option<String>,
}

impl<'t> Finding<'t> {
    /// A finding tagged with the node's own kind name.
    pub fn new(node: &'t Node) -> Self {
        Self {
            node,
            tag: node.kind_name().to_string(),
            description: None,
        }
    }

    /// A finding with a synthetic tag such as `TooManyReturns`.
    ///
    /// An empty tag falls back to the node's kind name.
    pub fn tagged(node: &'t Node, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if tag.is_empty() {
            return Self::new(node);
        }
        Self {
            node,
            tag,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn node(&self) -> &'t Node {
        self.node
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn span(&self) -> Span {
        self.node.span
    }
}

/// Ordered findings of one traversal, in handler invocation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings<'t> {
    entries: Vec<Finding<'t>>,
}

impl<'t> Findings<'t> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a finding.
    pub fn push(&mut self, finding: Finding<'t>) {
        self.entries.push(finding);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding<'t>> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Finding<'t>] {
        &self.entries
    }

    /// Findings carrying the given tag.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Finding<'t>> + 'a {
        self.entries.iter().filter(move |f| f.tag == tag)
    }
}

impl<'t> IntoIterator for Findings<'t> {
    type Item = Finding<'t>;
    type IntoIter = std::vec::IntoIter<Finding<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, 't> IntoIterator for &'a Findings<'t> {
    type Item = &'a Finding<'t>;
    type IntoIter = std::slice::Iter<'a, Finding<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'t> Extend<Finding<'t>> for Findings<'t> {
    fn extend<I: IntoIterator<Item = Finding<'t>>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    fn this_node() -> Node {
        Node::new(NodeKind::ThisExpression, Span::default())
    }

    #[test]
    fn test_default_tag_is_kind_name() {
        let node = this_node();
        let finding = Finding::new(&node);
        assert_eq!(finding.tag(), "ThisExpression");
        assert!(finding.description().is_none());
    }

    #[test]
    fn test_empty_tag_falls_back() {
        let node = this_node();
        assert_eq!(Finding::tagged(&node, "").tag(), "ThisExpression");
        assert_eq!(Finding::tagged(&node, "Custom").tag(), "Custom");
    }

    #[test]
    fn test_findings_preserve_order() {
        let node = this_node();
        let mut findings = Findings::new();
        findings.push(Finding::tagged(&node, "First"));
        findings.push(Finding::tagged(&node, "Second").with_description("two"));

        let tags: Vec<_> = findings.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec!["First", "Second"]);
        assert_eq!(findings.with_tag("Second").count(), 1);
        assert!(std::ptr::eq(findings.as_slice()[0].node(), &node));
    }
}
