//! The closed syntax tree model handed to the traversal engine.

use std::fmt;

use super::{Comment, Span};

/// Declaration keyword of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "var" => Some(VarKind::Var),
            "let" => Some(VarKind::Let),
            "const" => Some(VarKind::Const),
            _ => None,
        }
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical category of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    Boolean,
    Null,
    RegExp,
}

/// A node of the parsed syntax tree.
///
/// Nodes form a strict tree: every child is owned by exactly one parent.
/// The analysis core only ever holds shared references into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

/// Kind-specific payload of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
        comments: Vec<Comment>,
    },

    // Statements
    ExpressionStatement {
        expression: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    /// A `case` clause; `test` is `None` for `default:`.
    SwitchCase {
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    VariableDeclaration {
        kind: VarKind,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    ForOfStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },

    // Functions
    FunctionDeclaration {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        is_async: bool,
        generator: bool,
    },
    FunctionExpression {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        is_async: bool,
        generator: bool,
    },
    /// `body` is either a `BlockStatement` or a bare expression.
    ArrowFunctionExpression {
        params: Vec<Node>,
        body: Box<Node>,
        is_async: bool,
    },

    // Expressions
    ArrayExpression {
        elements: Vec<Node>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        computed: bool,
        shorthand: bool,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
        optional: bool,
    },
    NewExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
        prefix: bool,
    },
    UpdateExpression {
        operator: String,
        argument: Box<Node>,
        prefix: bool,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
        optional: bool,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },
    /// Invariant: `quasis.len() == expressions.len() + 1`.
    TemplateLiteral {
        quasis: Vec<Node>,
        expressions: Vec<Node>,
    },
    TemplateElement {
        raw: String,
    },
    ThisExpression,
    Identifier {
        name: String,
    },
    /// `raw` is the literal exactly as written in the source.
    Literal {
        raw: String,
        kind: LiteralKind,
    },

    /// Any grammar construct outside the supported subset.
    Other {
        kind: String,
        children: Vec<Node>,
    },
}

/// Fieldless tag of a [`NodeKind`], used to key handler registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Program,
    ExpressionStatement,
    BlockStatement,
    IfStatement,
    SwitchStatement,
    SwitchCase,
    VariableDeclaration,
    VariableDeclarator,
    ReturnStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    TryStatement,
    CatchClause,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
    ArrayExpression,
    ObjectExpression,
    Property,
    CallExpression,
    NewExpression,
    AssignmentExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    UpdateExpression,
    MemberExpression,
    ConditionalExpression,
    SequenceExpression,
    TemplateLiteral,
    TemplateElement,
    ThisExpression,
    Identifier,
    Literal,
    Other,
}

impl NodeType {
    /// The three function-like kinds.
    pub const FUNCTIONS: [NodeType; 3] = [
        NodeType::FunctionDeclaration,
        NodeType::FunctionExpression,
        NodeType::ArrowFunctionExpression,
    ];

    /// The loop statement kinds.
    pub const LOOPS: [NodeType; 5] = [
        NodeType::ForStatement,
        NodeType::ForInStatement,
        NodeType::ForOfStatement,
        NodeType::WhileStatement,
        NodeType::DoWhileStatement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Program => "Program",
            NodeType::ExpressionStatement => "ExpressionStatement",
            NodeType::BlockStatement => "BlockStatement",
            NodeType::IfStatement => "IfStatement",
            NodeType::SwitchStatement => "SwitchStatement",
            NodeType::SwitchCase => "SwitchCase",
            NodeType::VariableDeclaration => "VariableDeclaration",
            NodeType::VariableDeclarator => "VariableDeclarator",
            NodeType::ReturnStatement => "ReturnStatement",
            NodeType::ForStatement => "ForStatement",
            NodeType::ForInStatement => "ForInStatement",
            NodeType::ForOfStatement => "ForOfStatement",
            NodeType::WhileStatement => "WhileStatement",
            NodeType::DoWhileStatement => "DoWhileStatement",
            NodeType::TryStatement => "TryStatement",
            NodeType::CatchClause => "CatchClause",
            NodeType::FunctionDeclaration => "FunctionDeclaration",
            NodeType::FunctionExpression => "FunctionExpression",
            NodeType::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeType::ArrayExpression => "ArrayExpression",
            NodeType::ObjectExpression => "ObjectExpression",
            NodeType::Property => "Property",
            NodeType::CallExpression => "CallExpression",
            NodeType::NewExpression => "NewExpression",
            NodeType::AssignmentExpression => "AssignmentExpression",
            NodeType::BinaryExpression => "BinaryExpression",
            NodeType::LogicalExpression => "LogicalExpression",
            NodeType::UnaryExpression => "UnaryExpression",
            NodeType::UpdateExpression => "UpdateExpression",
            NodeType::MemberExpression => "MemberExpression",
            NodeType::ConditionalExpression => "ConditionalExpression",
            NodeType::SequenceExpression => "SequenceExpression",
            NodeType::TemplateLiteral => "TemplateLiteral",
            NodeType::TemplateElement => "TemplateElement",
            NodeType::ThisExpression => "ThisExpression",
            NodeType::Identifier => "Identifier",
            NodeType::Literal => "Literal",
            NodeType::Other => "Other",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { span, kind }
    }

    /// The registry key for this node.
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Program { .. } => NodeType::Program,
            NodeKind::ExpressionStatement { .. } => NodeType::ExpressionStatement,
            NodeKind::BlockStatement { .. } => NodeType::BlockStatement,
            NodeKind::IfStatement { .. } => NodeType::IfStatement,
            NodeKind::SwitchStatement { .. } => NodeType::SwitchStatement,
            NodeKind::SwitchCase { .. } => NodeType::SwitchCase,
            NodeKind::VariableDeclaration { .. } => NodeType::VariableDeclaration,
            NodeKind::VariableDeclarator { .. } => NodeType::VariableDeclarator,
            NodeKind::ReturnStatement { .. } => NodeType::ReturnStatement,
            NodeKind::ForStatement { .. } => NodeType::ForStatement,
            NodeKind::ForInStatement { .. } => NodeType::ForInStatement,
            NodeKind::ForOfStatement { .. } => NodeType::ForOfStatement,
            NodeKind::WhileStatement { .. } => NodeType::WhileStatement,
            NodeKind::DoWhileStatement { .. } => NodeType::DoWhileStatement,
            NodeKind::TryStatement { .. } => NodeType::TryStatement,
            NodeKind::CatchClause { .. } => NodeType::CatchClause,
            NodeKind::FunctionDeclaration { .. } => NodeType::FunctionDeclaration,
            NodeKind::FunctionExpression { .. } => NodeType::FunctionExpression,
            NodeKind::ArrowFunctionExpression { .. } => NodeType::ArrowFunctionExpression,
            NodeKind::ArrayExpression { .. } => NodeType::ArrayExpression,
            NodeKind::ObjectExpression { .. } => NodeType::ObjectExpression,
            NodeKind::Property { .. } => NodeType::Property,
            NodeKind::CallExpression { .. } => NodeType::CallExpression,
            NodeKind::NewExpression { .. } => NodeType::NewExpression,
            NodeKind::AssignmentExpression { .. } => NodeType::AssignmentExpression,
            NodeKind::BinaryExpression { .. } => NodeType::BinaryExpression,
            NodeKind::LogicalExpression { .. } => NodeType::LogicalExpression,
            NodeKind::UnaryExpression { .. } => NodeType::UnaryExpression,
            NodeKind::UpdateExpression { .. } => NodeType::UpdateExpression,
            NodeKind::MemberExpression { .. } => NodeType::MemberExpression,
            NodeKind::ConditionalExpression { .. } => NodeType::ConditionalExpression,
            NodeKind::SequenceExpression { .. } => NodeType::SequenceExpression,
            NodeKind::TemplateLiteral { .. } => NodeType::TemplateLiteral,
            NodeKind::TemplateElement { .. } => NodeType::TemplateElement,
            NodeKind::ThisExpression => NodeType::ThisExpression,
            NodeKind::Identifier { .. } => NodeType::Identifier,
            NodeKind::Literal { .. } => NodeType::Literal,
            NodeKind::Other { .. } => NodeType::Other,
        }
    }

    /// Kind name for display. Unsupported constructs report their grammar kind.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            NodeKind::Other { kind, .. } => kind.as_str(),
            _ => self.node_type().as_str(),
        }
    }

    pub fn is_function(&self) -> bool {
        NodeType::FUNCTIONS.contains(&self.node_type())
    }

    /// Name of an `Identifier` node.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Parameters of a function-like node.
    pub fn params(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::FunctionDeclaration { params, .. }
            | NodeKind::FunctionExpression { params, .. }
            | NodeKind::ArrowFunctionExpression { params, .. } => Some(params.as_slice()),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        fn opt(n: &Option<Box<Node>>) -> Option<&Node> {
            n.as_deref()
        }

        let mut out: Vec<&Node> = Vec::new();
        match &self.kind {
            NodeKind::Program { body, .. }
            | NodeKind::BlockStatement { body } => out.extend(body),
            NodeKind::ExpressionStatement { expression } => out.push(expression),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.extend(opt(alternate));
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                out.push(discriminant);
                out.extend(cases);
            }
            NodeKind::SwitchCase { test, consequent } => {
                out.extend(opt(test));
                out.extend(consequent);
            }
            NodeKind::VariableDeclaration { declarations, .. } => out.extend(declarations),
            NodeKind::VariableDeclarator { id, init } => {
                out.push(id);
                out.extend(opt(init));
            }
            NodeKind::ReturnStatement { argument } => out.extend(opt(argument)),
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                out.extend(opt(init));
                out.extend(opt(test));
                out.extend(opt(update));
                out.push(body);
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => {
                out.push(left);
                out.push(right);
                out.push(body);
            }
            NodeKind::WhileStatement { test, body } => {
                out.push(test);
                out.push(body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                out.push(body);
                out.push(test);
            }
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                out.push(block);
                out.extend(opt(handler));
                out.extend(opt(finalizer));
            }
            NodeKind::CatchClause { param, body } => {
                out.extend(opt(param));
                out.push(body);
            }
            NodeKind::FunctionDeclaration {
                id, params, body, ..
            }
            | NodeKind::FunctionExpression {
                id, params, body, ..
            } => {
                out.extend(opt(id));
                out.extend(params);
                out.push(body);
            }
            NodeKind::ArrowFunctionExpression { params, body, .. } => {
                out.extend(params);
                out.push(body);
            }
            NodeKind::ArrayExpression { elements } => out.extend(elements),
            NodeKind::ObjectExpression { properties } => out.extend(properties),
            NodeKind::Property {
                key,
                value,
                shorthand,
                ..
            } => {
                out.push(key);
                if !shorthand {
                    out.push(value);
                }
            }
            NodeKind::CallExpression {
                callee, arguments, ..
            }
            | NodeKind::NewExpression { callee, arguments } => {
                out.push(callee);
                out.extend(arguments);
            }
            NodeKind::AssignmentExpression { left, right, .. }
            | NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => out.push(argument),
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                out.push(object);
                out.push(property);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.push(alternate);
            }
            NodeKind::SequenceExpression { expressions } => out.extend(expressions),
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            } => {
                // Interleave in source order: quasi, expr, quasi, ...
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push(quasi);
                    if let Some(expr) = expressions.get(i) {
                        out.push(expr);
                    }
                }
            }
            NodeKind::Other { children, .. } => out.extend(children),
            NodeKind::TemplateElement { .. }
            | NodeKind::ThisExpression
            | NodeKind::Identifier { .. }
            | NodeKind::Literal { .. } => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Node {
        Node::new(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            Span::default(),
        )
    }

    #[test]
    fn test_kind_name_reports_grammar_kind_for_other() {
        let node = Node::new(
            NodeKind::Other {
                kind: "class_declaration".to_string(),
                children: vec![],
            },
            Span::default(),
        );
        assert_eq!(node.node_type(), NodeType::Other);
        assert_eq!(node.kind_name(), "class_declaration");
        assert_eq!(ident("a").kind_name(), "Identifier");
    }

    #[test]
    fn test_children_in_source_order() {
        let member = Node::new(
            NodeKind::MemberExpression {
                object: Box::new(ident("a")),
                property: Box::new(ident("b")),
                computed: false,
                optional: false,
            },
            Span::default(),
        );
        let names: Vec<_> = member
            .children()
            .iter()
            .filter_map(|n| n.identifier_name())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_shorthand_property_yields_single_child() {
        let prop = Node::new(
            NodeKind::Property {
                key: Box::new(ident("x")),
                value: Box::new(ident("x")),
                computed: false,
                shorthand: true,
            },
            Span::default(),
        );
        assert_eq!(prop.children().len(), 1);
    }

    #[test]
    fn test_var_kind_round_trip() {
        for kind in [VarKind::Var, VarKind::Let, VarKind::Const] {
            assert_eq!(VarKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(VarKind::parse("using"), None);
    }
}
