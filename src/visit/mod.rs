//! Depth-first, kind-dispatched traversal engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Node tree    │────▶│ Engine       │────▶│ Findings     │
//! └──────────────┘     │ (Registry)   │     │ (ordered)    │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! The [`Engine`] looks up the handler registered for each node's
//! [`NodeType`] and invokes it. Nodes whose kind has no handler are skipped
//! together with their whole subtree.
//!
//! # Extension contract
//!
//! A handler registered with [`Registry::register`] or [`Registry::with`]
//! replaces whatever was registered for that kind before, including the
//! structural default. It has to recurse on its own, usually by calling
//! [`Engine::descend`], or the node's children are never visited.
//! [`Registry::chain`] is the explicit alternative: the new handler runs
//! first, then the handler it displaced.

mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::ast::{Node, NodeType};
use crate::findings::Findings;

pub use builtin::{walk, STRUCTURAL, STUBS};

/// Signature shared by every handler.
pub type HandlerFn =
    dyn for<'t> Fn(&Engine, &'t Node, Option<&'t Node>, &mut Findings<'t>) + Send + Sync;

/// A kind handler. Cloning shares the underlying function.
pub type Handler = Arc<HandlerFn>;

/// Wrap a closure or function as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: for<'t> Fn(&Engine, &'t Node, Option<&'t Node>, &mut Findings<'t>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A handler that does nothing, leaving the subtree unvisited.
pub fn noop() -> Handler {
    handler(|_, _, _, _| {})
}

static BUILTIN: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::empty();
    registry.register(STRUCTURAL.iter().map(|&ty| (ty, handler(walk))));
    registry.register(STUBS.iter().map(|&ty| (ty, noop())));
    registry
});

/// Mapping from node kind to handler.
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<NodeType, Handler>,
}

impl Registry {
    /// A registry with no handlers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The structural defaults: recurse into children, produce nothing.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Merge handlers into this registry, overwriting existing entries.
    pub fn register<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = (NodeType, Handler)>,
    {
        for (ty, h) in handlers {
            tracing::debug!("Registering type -> {}", ty);
            self.handlers.insert(ty, h);
        }
    }

    /// Builder form of [`Registry::register`] for a single kind.
    pub fn with(mut self, ty: NodeType, h: Handler) -> Self {
        self.register([(ty, h)]);
        self
    }

    /// Register `h` for `ty` so that it runs before the handler it displaces.
    ///
    /// When nothing was registered for `ty`, `h` runs alone.
    pub fn chain(&mut self, ty: NodeType, h: Handler) {
        let composed = match self.handlers.get(&ty).cloned() {
            Some(prev) => handler(move |engine, node, parent, sink| {
                h(engine, node, parent, sink);
                prev(engine, node, parent, sink);
            }),
            None => h,
        };
        self.register([(ty, composed)]);
    }

    /// A copy of this registry with `other` merged on top.
    pub fn merged(&self, other: &Registry) -> Registry {
        let mut merged = self.clone();
        merged.register(other.handlers.iter().map(|(ty, h)| (*ty, h.clone())));
        merged
    }

    /// Drop the handler for `ty`, so its subtrees are skipped.
    pub fn remove(&mut self, ty: NodeType) -> Option<Handler> {
        self.handlers.remove(&ty)
    }

    pub fn get(&self, ty: NodeType) -> Option<&Handler> {
        self.handlers.get(&ty)
    }

    pub fn contains(&self, ty: NodeType) -> bool {
        self.handlers.contains_key(&ty)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<NodeType> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Traversal engine over an immutable registry.
///
/// Each analysis owns its engine, so registries are never shared mutably
/// between analyses.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Registry,
}

impl Engine {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Walk a whole tree from its root and return the accumulated findings.
    pub fn run<'t>(&self, root: &'t Node) -> Findings<'t> {
        let mut sink = Findings::new();
        self.visit(root, None, &mut sink);
        sink
    }

    /// Dispatch `node` to its registered handler; unregistered kinds are skipped.
    pub fn visit<'t>(&self, node: &'t Node, parent: Option<&'t Node>, sink: &mut Findings<'t>) {
        match self.registry.get(node.node_type()) {
            Some(h) => h(self, node, parent, sink),
            None => tracing::trace!("skipping unregistered {} at {}", node.kind_name(), node.span),
        }
    }

    /// Run the built-in structural behavior for `node`, whatever is registered.
    pub fn descend<'t>(&self, node: &'t Node, parent: Option<&'t Node>, sink: &mut Findings<'t>) {
        walk(self, node, parent, sink);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Registry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Span};
    use crate::findings::Finding;

    fn ident(name: &str) -> Node {
        Node::new(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            Span::default(),
        )
    }

    fn program(body: Vec<Node>) -> Node {
        Node::new(
            NodeKind::Program {
                body,
                comments: vec![],
            },
            Span::default(),
        )
    }

    fn expr_stmt(expression: Node) -> Node {
        Node::new(
            NodeKind::ExpressionStatement {
                expression: Box::new(expression),
            },
            Span::default(),
        )
    }

    fn report_identifiers() -> Handler {
        handler(|_, node, _, sink| sink.push(Finding::new(node)))
    }

    #[test]
    fn test_builtin_contains_structural_and_stubs() {
        let registry = Registry::builtin();
        assert!(registry.contains(NodeType::Program));
        assert!(registry.contains(NodeType::ForStatement));
        assert!(registry.contains(NodeType::TryStatement));
        assert!(!registry.contains(NodeType::Identifier));
        assert!(!registry.contains(NodeType::Other));
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = Registry::builtin();
        let before = registry.len();
        registry.register([(NodeType::Program, noop())]);
        assert_eq!(registry.len(), before);

        let tree = program(vec![expr_stmt(ident("a"))]);
        let engine = Engine::new(registry.with(NodeType::Identifier, report_identifiers()));
        // Program no longer recurses, so the identifier is never reached.
        assert!(engine.run(&tree).is_empty());
    }

    #[test]
    fn test_unregistered_kind_is_skipped() {
        let tree = program(vec![expr_stmt(ident("a"))]);
        let engine = Engine::new(Registry::builtin().with(NodeType::Identifier, report_identifiers()));
        assert_eq!(engine.run(&tree).len(), 1);

        let mut registry = Registry::builtin().with(NodeType::Identifier, report_identifiers());
        registry.remove(NodeType::ExpressionStatement);
        assert!(Engine::new(registry).run(&tree).is_empty());
    }

    #[test]
    fn test_chain_runs_new_then_previous() {
        let mut registry = Registry::builtin();
        registry.chain(
            NodeType::ExpressionStatement,
            handler(|_, node, _, sink| sink.push(Finding::tagged(node, "Statement"))),
        );
        registry.register([(NodeType::Identifier, report_identifiers())]);

        let tree = program(vec![expr_stmt(ident("a"))]);
        let findings = Engine::new(registry).run(&tree);
        let tags: Vec<_> = findings.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec!["Statement", "Identifier"]);
    }

    #[test]
    fn test_merged_leaves_original_untouched() {
        let base = Registry::builtin();
        let rules = Registry::empty().with(NodeType::Identifier, report_identifiers());
        let merged = base.merged(&rules);
        assert!(merged.contains(NodeType::Identifier));
        assert!(!base.contains(NodeType::Identifier));
    }

    #[test]
    fn test_descend_recurses_after_override() {
        let registry = Registry::builtin()
            .with(
                NodeType::Program,
                handler(|engine, node, parent, sink| {
                    sink.push(Finding::tagged(node, "Root"));
                    engine.descend(node, parent, sink);
                }),
            )
            .with(NodeType::Identifier, report_identifiers());
        let tree = program(vec![expr_stmt(ident("a")), expr_stmt(ident("b"))]);
        let findings = Engine::new(registry).run(&tree);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings.as_slice()[0].tag(), "Root");
    }
}
