//! Source reconstruction for display.
//!
//! [`reconstruct`] turns a node (or a finding wrapping one) back into
//! source-like text. Dispatch is on the node's kind only, never on a
//! finding's tag. The function is pure: the same node always yields the same
//! string. Kinds outside the supported table yield an empty string.

mod beautify;

pub use beautify::beautify;

use crate::ast::{Node, NodeKind};
use crate::findings::Finding;

/// A node to reconstruct, optionally carrying the tag of the finding it came from.
#[derive(Debug, Clone, Copy)]
pub struct Target<'t> {
    pub node: &'t Node,
    pub tag: Option<&'t str>,
}

impl<'t> From<&'t Node> for Target<'t> {
    fn from(node: &'t Node) -> Self {
        Self { node, tag: None }
    }
}

impl<'a, 't> From<&'a Finding<'t>> for Target<'a> {
    fn from(finding: &'a Finding<'t>) -> Self {
        Self {
            node: finding.node(),
            tag: Some(finding.tag()),
        }
    }
}

/// Reconstruct source-like text for a node or a finding.
pub fn reconstruct<'t>(target: impl Into<Target<'t>>) -> String {
    node_text(target.into().node)
}

fn node_text(node: &Node) -> String {
    match &node.kind {
        NodeKind::ArrayExpression { elements } => format!("[{}]", join(elements)),
        NodeKind::ArrowFunctionExpression { params, body, .. } => {
            let body = match &body.kind {
                NodeKind::BlockStatement { .. } => braced(&node_text(body)),
                _ => node_text(body),
            };
            format!("({}) => {}", join(params), body)
        }
        NodeKind::AssignmentExpression {
            operator,
            left,
            right,
        }
        | NodeKind::BinaryExpression {
            operator,
            left,
            right,
        }
        | NodeKind::LogicalExpression {
            operator,
            left,
            right,
        } => format!("{} {} {}", node_text(left), operator, node_text(right)),
        NodeKind::BlockStatement { body } => statements(body),
        NodeKind::CallExpression {
            callee,
            arguments,
            optional,
        } => {
            let chain = if *optional { "?." } else { "" };
            format!("{}{}({})", node_text(callee), chain, join(arguments))
        }
        NodeKind::NewExpression { callee, arguments } => {
            format!("new {}({})", node_text(callee), join(arguments))
        }
        NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => format!(
            "({} ? {} : {})",
            node_text(test),
            node_text(consequent),
            node_text(alternate)
        ),
        NodeKind::ExpressionStatement { expression } => node_text(expression),
        NodeKind::ForInStatement { left, right, body } => for_each(left, "in", right, body),
        NodeKind::ForOfStatement { left, right, body } => for_each(left, "of", right, body),
        NodeKind::ForStatement {
            init,
            test,
            update,
            body,
        } => format!(
            "for ({}; {}; {}) {}",
            opt_text(init),
            opt_text(test),
            opt_text(update),
            braced(&body_text(body))
        ),
        NodeKind::FunctionDeclaration { id, body, .. } => {
            let name = opt_text(id);
            format!("function {} {}", name, braced(&node_text(body)))
        }
        NodeKind::FunctionExpression { params, body, .. } => {
            format!("function ({}) {}", join(params), braced(&node_text(body)))
        }
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        } => {
            let mut out = format!(
                "if ({}) {}",
                node_text(test),
                braced(&body_text(consequent))
            );
            if let Some(alternate) = alternate {
                out.push_str(" else ");
                match &alternate.kind {
                    NodeKind::IfStatement { .. } => out.push_str(&node_text(alternate)),
                    _ => out.push_str(&braced(&body_text(alternate))),
                }
            }
            out
        }
        NodeKind::Literal { raw, .. } => raw.clone(),
        NodeKind::MemberExpression {
            object,
            property,
            computed,
            optional,
        } => {
            let chain = if *optional { "?." } else { "" };
            if *computed {
                format!("{}{}[{}]", node_text(object), chain, node_text(property))
            } else {
                let dot = if *optional { "?." } else { "." };
                format!("{}{}{}", node_text(object), dot, node_text(property))
            }
        }
        NodeKind::ObjectExpression { properties } => {
            // Spreads and methods have no text of their own.
            let members: Vec<String> = properties
                .iter()
                .map(node_text)
                .filter(|text| !text.is_empty())
                .collect();
            if members.is_empty() {
                "{}".to_string()
            } else {
                format!("{{ {} }}", members.join(", "))
            }
        }
        NodeKind::Property {
            key,
            value,
            computed,
            shorthand,
        } => {
            if *shorthand {
                node_text(key)
            } else if *computed {
                format!("[{}]: {}", node_text(key), node_text(value))
            } else {
                format!("{}: {}", node_text(key), node_text(value))
            }
        }
        NodeKind::ReturnStatement { argument } => match argument {
            Some(argument) => format!("return {}", node_text(argument)),
            None => "return".to_string(),
        },
        NodeKind::SequenceExpression { expressions } => join(expressions),
        NodeKind::TemplateElement { raw } => raw.clone(),
        NodeKind::TemplateLiteral {
            quasis,
            expressions,
        } => {
            let mut out = String::from("`");
            for (i, quasi) in quasis.iter().enumerate() {
                out.push_str(&node_text(quasi));
                if let Some(expr) = expressions.get(i) {
                    out.push_str("${");
                    out.push_str(&node_text(expr));
                    out.push('}');
                }
            }
            out.push('`');
            out
        }
        NodeKind::ThisExpression => "this".to_string(),
        NodeKind::UnaryExpression {
            operator,
            argument,
            prefix,
        }
        | NodeKind::UpdateExpression {
            operator,
            argument,
            prefix,
        } => {
            if *prefix {
                format!("{} {}", operator, node_text(argument))
            } else {
                format!("{} {}", node_text(argument), operator)
            }
        }
        NodeKind::VariableDeclaration { kind, declarations } => {
            format!("{} {}", kind, join(declarations))
        }
        NodeKind::VariableDeclarator { id, init } => match init {
            Some(init) => format!("{} = {}", node_text(id), node_text(init)),
            None => node_text(id),
        },
        NodeKind::WhileStatement { test, body } => {
            format!("while ({}) {}", node_text(test), braced(&body_text(body)))
        }

        NodeKind::Program { .. }
        | NodeKind::SwitchStatement { .. }
        | NodeKind::SwitchCase { .. }
        | NodeKind::DoWhileStatement { .. }
        | NodeKind::TryStatement { .. }
        | NodeKind::CatchClause { .. }
        | NodeKind::Other { .. } => String::new(),
    }
}

fn opt_text(node: &Option<Box<Node>>) -> String {
    node.as_deref().map(node_text).unwrap_or_default()
}

/// Comma-join in element order.
fn join(nodes: &[Node]) -> String {
    nodes.iter().map(node_text).collect::<Vec<_>>().join(", ")
}

/// Each statement terminated with `;`.
fn statements(nodes: &[Node]) -> String {
    nodes.iter().map(|n| format!("{};", node_text(n))).collect()
}

/// Inner text of a statement body: a block's statements, or the single statement.
fn body_text(body: &Node) -> String {
    match &body.kind {
        NodeKind::BlockStatement { body } => statements(body),
        _ => statements(std::slice::from_ref(body)),
    }
}

fn braced(inner: &str) -> String {
    if inner.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", inner)
    }
}

fn for_each(left: &Node, keyword: &str, right: &Node, body: &Node) -> String {
    format!(
        "for ({} {} {}) {}",
        node_text(left),
        keyword,
        node_text(right),
        braced(&body_text(body))
    )
}
