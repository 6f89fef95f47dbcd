//! Structural default handlers.
//!
//! These only recurse so that rule handlers registered for deeper kinds are
//! reached. A few kinds hand their own `parent` down instead of themselves
//! (blocks, expression statements, declarators, object members), which lets
//! rules reason about the nearest function or conditional rather than the
//! nearest block.

use crate::ast::{Node, NodeKind, NodeType};
use crate::findings::Findings;

use super::Engine;

/// Kinds whose default handler is [`walk`].
pub const STRUCTURAL: &[NodeType] = &[
    NodeType::Program,
    NodeType::ExpressionStatement,
    NodeType::BlockStatement,
    NodeType::IfStatement,
    NodeType::SwitchStatement,
    NodeType::SwitchCase,
    NodeType::VariableDeclaration,
    NodeType::VariableDeclarator,
    NodeType::ReturnStatement,
    NodeType::FunctionDeclaration,
    NodeType::FunctionExpression,
    NodeType::ArrowFunctionExpression,
    NodeType::ArrayExpression,
    NodeType::ObjectExpression,
    NodeType::Property,
    NodeType::CallExpression,
    NodeType::NewExpression,
    NodeType::AssignmentExpression,
    NodeType::BinaryExpression,
    NodeType::LogicalExpression,
    NodeType::UnaryExpression,
    NodeType::UpdateExpression,
    NodeType::MemberExpression,
    NodeType::ConditionalExpression,
    NodeType::SequenceExpression,
    NodeType::TemplateLiteral,
];

/// Kinds registered as no-op extension points: loops and exception handling.
pub const STUBS: &[NodeType] = &[
    NodeType::ForStatement,
    NodeType::ForInStatement,
    NodeType::ForOfStatement,
    NodeType::WhileStatement,
    NodeType::DoWhileStatement,
    NodeType::TryStatement,
];

/// The built-in structural behavior for `node`.
pub fn walk<'t>(engine: &Engine, node: &'t Node, parent: Option<&'t Node>, sink: &mut Findings<'t>) {
    let this = Some(node);

    match &node.kind {
        NodeKind::Program { body, .. } => {
            for stmt in body {
                engine.visit(stmt, this, sink);
            }
        }
        NodeKind::ExpressionStatement { expression } => engine.visit(expression, parent, sink),
        NodeKind::BlockStatement { body } => {
            for stmt in body {
                engine.visit(stmt, parent, sink);
            }
        }
        NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        } => {
            engine.visit(test, this, sink);
            engine.visit(consequent, this, sink);
            if let Some(alternate) = alternate {
                engine.visit(alternate, this, sink);
            }
        }
        NodeKind::SwitchStatement {
            discriminant,
            cases,
        } => {
            engine.visit(discriminant, this, sink);
            for case in cases {
                engine.visit(case, this, sink);
            }
        }
        NodeKind::SwitchCase { test, consequent } => {
            if let Some(test) = test {
                engine.visit(test, this, sink);
            }
            for stmt in consequent {
                engine.visit(stmt, this, sink);
            }
        }
        NodeKind::VariableDeclaration { declarations, .. } => {
            for decl in declarations {
                engine.visit(decl, this, sink);
            }
        }
        NodeKind::VariableDeclarator { id, init } => {
            engine.visit(id, parent, sink);
            if let Some(init) = init {
                engine.visit(init, parent, sink);
            }
        }
        NodeKind::ReturnStatement { argument } => {
            if let Some(argument) = argument {
                engine.visit(argument, this, sink);
            }
        }
        NodeKind::FunctionDeclaration { body, .. } | NodeKind::FunctionExpression { body, .. } => {
            visit_function_body(engine, node, body, sink);
        }
        NodeKind::ArrowFunctionExpression { body, .. } => {
            visit_function_body(engine, node, body, sink);
        }
        NodeKind::ArrayExpression { elements } => {
            for element in elements {
                engine.visit(element, this, sink);
            }
        }
        NodeKind::ObjectExpression { properties } => {
            for prop in properties {
                engine.visit(prop, parent, sink);
            }
        }
        NodeKind::Property { value, .. } => engine.visit(value, parent, sink),
        // Arguments are visited before the callee.
        NodeKind::CallExpression {
            callee, arguments, ..
        }
        | NodeKind::NewExpression { callee, arguments } => {
            for arg in arguments {
                engine.visit(arg, this, sink);
            }
            engine.visit(callee, this, sink);
        }
        NodeKind::AssignmentExpression { left, right, .. }
        | NodeKind::BinaryExpression { left, right, .. }
        | NodeKind::LogicalExpression { left, right, .. } => {
            engine.visit(left, this, sink);
            engine.visit(right, this, sink);
        }
        NodeKind::UnaryExpression { argument, .. } | NodeKind::UpdateExpression { argument, .. } => {
            engine.visit(argument, this, sink);
        }
        NodeKind::MemberExpression { object, .. } => engine.visit(object, parent, sink),
        NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            engine.visit(test, this, sink);
            engine.visit(consequent, this, sink);
            engine.visit(alternate, this, sink);
        }
        NodeKind::SequenceExpression { expressions } => {
            for expr in expressions {
                engine.visit(expr, this, sink);
            }
        }
        NodeKind::TemplateLiteral { expressions, .. } => {
            for expr in expressions {
                engine.visit(expr, this, sink);
            }
        }

        // Extension points and leaves.
        NodeKind::ForStatement { .. }
        | NodeKind::ForInStatement { .. }
        | NodeKind::ForOfStatement { .. }
        | NodeKind::WhileStatement { .. }
        | NodeKind::DoWhileStatement { .. }
        | NodeKind::TryStatement { .. }
        | NodeKind::CatchClause { .. }
        | NodeKind::TemplateElement { .. }
        | NodeKind::ThisExpression
        | NodeKind::Identifier { .. }
        | NodeKind::Literal { .. }
        | NodeKind::Other { .. } => {}
    }
}

/// Statements of a block body are visited with the function as their parent.
fn visit_function_body<'t>(engine: &Engine, function: &'t Node, body: &'t Node, sink: &mut Findings<'t>) {
    match &body.kind {
        NodeKind::BlockStatement { body: stmts } => {
            for stmt in stmts {
                engine.visit(stmt, Some(function), sink);
            }
        }
        _ => engine.visit(body, Some(function), sink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::findings::Finding;
    use crate::visit::{handler, Registry};

    fn node(kind: NodeKind) -> Node {
        Node::new(kind, Span::default())
    }

    fn ident(name: &str) -> Node {
        node(NodeKind::Identifier {
            name: name.to_string(),
        })
    }

    /// Records each identifier together with its parent's kind as the tag.
    fn parent_recorder() -> Registry {
        Registry::builtin().with(
            NodeType::Identifier,
            handler(|_, node, parent, sink| {
                let tag = parent.map(|p| p.kind_name()).unwrap_or("none");
                sink.push(Finding::tagged(node, tag));
            }),
        )
    }

    #[test]
    fn test_block_passes_logical_parent_through() {
        // function f() { x; }
        let func = node(NodeKind::FunctionExpression {
            id: None,
            params: vec![],
            body: Box::new(node(NodeKind::BlockStatement {
                body: vec![node(NodeKind::ExpressionStatement {
                    expression: Box::new(ident("x")),
                })],
            })),
            is_async: false,
            generator: false,
        });
        let if_stmt = node(NodeKind::IfStatement {
            test: Box::new(ident("t")),
            consequent: Box::new(node(NodeKind::BlockStatement {
                body: vec![node(NodeKind::ExpressionStatement {
                    expression: Box::new(ident("y")),
                })],
            })),
            alternate: None,
        });
        let tree = node(NodeKind::Program {
            body: vec![
                node(NodeKind::ExpressionStatement {
                    expression: Box::new(func),
                }),
                if_stmt,
            ],
            comments: vec![],
        });

        let findings = Engine::new(parent_recorder()).run(&tree);
        let tags: Vec<_> = findings.iter().map(|f| f.tag()).collect();
        assert_eq!(
            tags,
            vec!["FunctionExpression", "IfStatement", "IfStatement"]
        );
    }

    #[test]
    fn test_call_visits_arguments_before_callee() {
        let call = node(NodeKind::CallExpression {
            callee: Box::new(ident("f")),
            arguments: vec![ident("a"), ident("b")],
            optional: false,
        });
        let tree = node(NodeKind::Program {
            body: vec![node(NodeKind::ExpressionStatement {
                expression: Box::new(call),
            })],
            comments: vec![],
        });

        let engine = Engine::new(Registry::builtin().with(
            NodeType::Identifier,
            handler(|_, node, _, sink| sink.push(Finding::new(node))),
        ));
        let findings = engine.run(&tree);
        let names: Vec<_> = findings
            .iter()
            .filter_map(|f| f.node().identifier_name())
            .collect();
        assert_eq!(names, vec!["a", "b", "f"]);
    }

    #[test]
    fn test_loops_are_not_entered_by_default() {
        let loop_stmt = node(NodeKind::WhileStatement {
            test: Box::new(ident("cond")),
            body: Box::new(node(NodeKind::ExpressionStatement {
                expression: Box::new(ident("x")),
            })),
        });
        let tree = node(NodeKind::Program {
            body: vec![loop_stmt],
            comments: vec![],
        });
        assert!(Engine::new(parent_recorder()).run(&tree).is_empty());
    }

    #[test]
    fn test_member_only_visits_object() {
        let member = node(NodeKind::MemberExpression {
            object: Box::new(ident("obj")),
            property: Box::new(ident("prop")),
            computed: false,
            optional: false,
        });
        let tree = node(NodeKind::Program {
            body: vec![node(NodeKind::ExpressionStatement {
                expression: Box::new(member),
            })],
            comments: vec![],
        });
        let findings = Engine::new(parent_recorder()).run(&tree);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.as_slice()[0].node().identifier_name(), Some("obj"));
        // Member and statement both pass the program through as parent.
        assert_eq!(findings.as_slice()[0].tag(), "Program");
    }
}
