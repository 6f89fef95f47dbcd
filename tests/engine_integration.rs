//! Integration tests for traversal and reconstruction over parsed sources.

use std::collections::HashSet;

use patternscan::ast::{Node, NodeKind, NodeType};
use patternscan::parser::languages::javascript;
use patternscan::visit::{handler, Engine, Registry, STRUCTURAL};
use patternscan::{reconstruct, Finding};

fn parse(source: &str) -> Node {
    javascript::new_parser()
        .parse(source)
        .expect("source should parse")
}

/// First node of kind `ty` in depth-first source order.
fn find(node: &Node, ty: NodeType) -> Option<&Node> {
    if node.node_type() == ty {
        return Some(node);
    }
    node.children().into_iter().find_map(|child| find(child, ty))
}

fn count_returns(node: &Node) -> usize {
    node.children()
        .into_iter()
        .filter(|child| !child.is_function())
        .map(|child| {
            let own = usize::from(matches!(child.kind, NodeKind::ReturnStatement { .. }));
            own + count_returns(child)
        })
        .sum()
}

#[test]
fn test_custom_function_handler_reports_too_many_returns() {
    let tree = parse(
        r#"
function pick(a, b) {
    if (a) {
        return 1;
    }
    if (b) {
        return 2;
    }
    return 3;
}
"#,
    );

    let registry = Registry::builtin().with(
        NodeType::FunctionDeclaration,
        handler(|engine, node, parent, sink| {
            if count_returns(node) > 1 {
                sink.push(Finding::tagged(node, "TooManyReturns"));
            }
            engine.descend(node, parent, sink);
        }),
    );
    let findings = Engine::new(registry).run(&tree);

    let function = find(&tree, NodeType::FunctionDeclaration).unwrap();
    let hit = findings
        .with_tag("TooManyReturns")
        .next()
        .expect("expected a TooManyReturns finding");
    assert!(std::ptr::eq(hit.node(), function));
    assert_eq!(hit.span().start_line, 2);
}

#[test]
fn test_override_without_descend_stops_traversal() {
    let tree = parse("function outer() { const inner = () => 1; }");

    let registry = Registry::builtin()
        .with(
            NodeType::FunctionDeclaration,
            handler(|_, node, _, sink| sink.push(Finding::new(node))),
        )
        .with(
            NodeType::ArrowFunctionExpression,
            handler(|_, node, _, sink| sink.push(Finding::new(node))),
        );
    let findings = Engine::new(registry).run(&tree);

    let tags: Vec<_> = findings.iter().map(|f| f.tag()).collect();
    assert_eq!(tags, vec!["FunctionDeclaration"]);
}

#[test]
fn test_each_registered_node_visited_once() {
    let tree = parse(
        r#"
const total = items.map((x) => x * 2).reduce((a, b) => a + b, 0);
function f(a) { return g(a, [a, { k: a }]) || !a; }
while (busy) { neverSeen(); }
"#,
    );

    let mut registry = Registry::empty();
    for &ty in STRUCTURAL {
        registry.register([(
            ty,
            handler(|engine, node, parent, sink| {
                sink.push(Finding::new(node));
                engine.descend(node, parent, sink);
            }),
        )]);
    }
    registry.register([(
        NodeType::Identifier,
        handler(|_, node, _, sink| sink.push(Finding::new(node))),
    )]);
    let findings = Engine::new(registry).run(&tree);

    let mut seen = HashSet::new();
    for finding in &findings {
        assert!(
            seen.insert(finding.node() as *const Node),
            "visited twice: {}",
            finding.tag()
        );
    }

    // The loop is unregistered, so neither it nor its body is visited.
    assert!(findings
        .iter()
        .all(|f| f.node().identifier_name() != Some("neverSeen")));
    assert!(findings
        .iter()
        .all(|f| f.node().node_type() != NodeType::WhileStatement));
    assert!(findings
        .iter()
        .any(|f| f.node().identifier_name() == Some("items")));
}

#[test]
fn test_reconstruct_examples() {
    let tree = parse("function f(x) { return x + 1; }");
    let ret = find(&tree, NodeType::ReturnStatement).unwrap();
    assert_eq!(reconstruct(ret), "return x + 1");

    let tree = parse("[];");
    assert_eq!(reconstruct(find(&tree, NodeType::ArrayExpression).unwrap()), "[]");

    let tree = parse("[1, 2];");
    assert_eq!(
        reconstruct(find(&tree, NodeType::ArrayExpression).unwrap()),
        "[1, 2]"
    );

    let tree = parse("a.b;");
    assert_eq!(
        reconstruct(find(&tree, NodeType::MemberExpression).unwrap()),
        "a.b"
    );

    let tree = parse("a[b];");
    assert_eq!(
        reconstruct(find(&tree, NodeType::MemberExpression).unwrap()),
        "a[b]"
    );
}

#[test]
fn test_reconstruct_is_repeatable() {
    let tree = parse("const greet = (name) => `hello ${name}, ${count + 1} new`;");
    let decl = find(&tree, NodeType::VariableDeclaration).unwrap();
    let first = reconstruct(decl);
    assert_eq!(first, reconstruct(decl));
    assert_eq!(
        first,
        "const greet = (name) => `hello ${name}, ${count + 1} new`"
    );
}

#[test]
fn test_reconstruct_from_finding_ignores_tag() {
    let tree = parse("x = y ? 1 : 2;");
    let node = find(&tree, NodeType::ConditionalExpression).unwrap();
    let finding = Finding::tagged(node, "Anything");
    assert_eq!(reconstruct(&finding), "(y ? 1 : 2)");
    assert_eq!(reconstruct(&finding), reconstruct(node));
}
