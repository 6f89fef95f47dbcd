//! Lowering from tree-sitter's concrete syntax tree into [`Node`].
//!
//! Grammar node kinds are mapped onto the closed node model. Anything the
//! model has no variant for becomes `Other`, carrying its lowered named
//! children so traversal and reconstruction still see through it.
//!
//! Each grammar kind has its own builder, picked by [`builder`] before the
//! call, so one level of nesting costs only that builder's frame.

use std::cell::Cell;

use tree_sitter::Node as TsNode;

use super::ParseError;
use crate::ast::{Comment, LiteralKind, Node, NodeKind, Span, VarKind};

/// Deepest nesting a source may have. Lowering, traversal and
/// reconstruction each recurse once per level.
pub const MAX_DEPTH: usize = 256;

pub(crate) struct Lowerer<'s> {
    source: &'s [u8],
    depth: Cell<usize>,
}

type Lowered = Result<Node, ParseError>;
type Built = Result<NodeKind, ParseError>;
type Builder<'s> = for<'a, 't> fn(&'a Lowerer<'s>, TsNode<'t>) -> Built;

impl<'s> Lowerer<'s> {
    pub(crate) fn new(source: &'s [u8]) -> Self {
        Self {
            source,
            depth: Cell::new(0),
        }
    }

    /// Lower the grammar's root into a `Program`, collecting every comment.
    pub(crate) fn program(&self, root: TsNode) -> Lowered {
        let body = self.lower_all(named(root))?;
        let mut comments = Vec::new();
        self.collect_comments(root, &mut comments);
        Ok(Node::new(NodeKind::Program { body, comments }, Span::from_node(root)))
    }

    fn text(&self, node: TsNode) -> &'s str {
        node.utf8_text(self.source).unwrap_or_default()
    }

    fn lower_all(&self, nodes: Vec<TsNode>) -> Result<Vec<Node>, ParseError> {
        nodes.into_iter().map(|n| self.lower(n)).collect()
    }

    fn boxed(&self, node: TsNode) -> Result<Box<Node>, ParseError> {
        self.lower(node).map(Box::new)
    }

    fn boxed_field(&self, node: TsNode, name: &'static str) -> Result<Box<Node>, ParseError> {
        self.boxed(field(node, name)?)
    }

    fn optional_field(&self, node: TsNode, name: &'static str) -> Result<Option<Box<Node>>, ParseError> {
        node.child_by_field_name(name).map(|n| self.boxed(n)).transpose()
    }

    fn lower(&self, node: TsNode) -> Lowered {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                line: node.start_position().row + 1,
                limit: MAX_DEPTH,
            });
        }
        self.depth.set(depth + 1);
        let lowered = self.lower_node(node);
        self.depth.set(depth);
        lowered
    }

    fn lower_node(&self, node: TsNode) -> Lowered {
        match node.kind() {
            "program" => self.program(node),
            "parenthesized_expression" | "else_clause" => self.lower(first_named(node)?),
            kind => {
                let kind = builder(kind)(self, node)?;
                Ok(Node::new(kind, Span::from_node(node)))
            }
        }
    }

    fn expression_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::ExpressionStatement {
            expression: self.boxed(first_named(node)?)?,
        })
    }

    fn statement_block(&self, node: TsNode) -> Built {
        Ok(NodeKind::BlockStatement {
            body: self.lower_all(named(node))?,
        })
    }

    fn if_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::IfStatement {
            test: self.boxed_field(node, "condition")?,
            consequent: self.boxed_field(node, "consequence")?,
            alternate: self.optional_field(node, "alternative")?,
        })
    }

    fn switch_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::SwitchStatement {
            discriminant: self.boxed_field(node, "value")?,
            cases: self.lower_all(named(field(node, "body")?))?,
        })
    }

    fn switch_case(&self, node: TsNode) -> Built {
        let value = node.child_by_field_name("value");
        let consequent = named(node)
            .into_iter()
            .filter(|c| Some(c.id()) != value.map(|v| v.id()))
            .collect();
        Ok(NodeKind::SwitchCase {
            test: value.map(|v| self.boxed(v)).transpose()?,
            consequent: self.lower_all(consequent)?,
        })
    }

    fn variable_declarator(&self, node: TsNode) -> Built {
        Ok(NodeKind::VariableDeclarator {
            id: self.boxed_field(node, "name")?,
            init: self.optional_field(node, "value")?,
        })
    }

    fn return_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::ReturnStatement {
            argument: named(node).first().map(|&n| self.boxed(n)).transpose()?,
        })
    }

    fn for_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::ForStatement {
            init: self.for_clause(node.child_by_field_name("initializer"))?,
            test: self.for_clause(node.child_by_field_name("condition"))?,
            update: self.optional_field(node, "increment")?,
            body: self.boxed_field(node, "body")?,
        })
    }

    fn while_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::WhileStatement {
            test: self.boxed_field(node, "condition")?,
            body: self.boxed_field(node, "body")?,
        })
    }

    fn do_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::DoWhileStatement {
            body: self.boxed_field(node, "body")?,
            test: self.boxed_field(node, "condition")?,
        })
    }

    fn try_statement(&self, node: TsNode) -> Built {
        Ok(NodeKind::TryStatement {
            block: self.boxed_field(node, "body")?,
            handler: self.optional_field(node, "handler")?,
            finalizer: node
                .child_by_field_name("finalizer")
                .map(|f| self.boxed_field(f, "body"))
                .transpose()?,
        })
    }

    fn catch_clause(&self, node: TsNode) -> Built {
        Ok(NodeKind::CatchClause {
            param: self.optional_field(node, "parameter")?,
            body: self.boxed_field(node, "body")?,
        })
    }

    fn function_declaration(&self, node: TsNode) -> Built {
        Ok(NodeKind::FunctionDeclaration {
            id: self.optional_field(node, "name")?,
            params: self.params(node)?,
            body: self.boxed_field(node, "body")?,
            is_async: has_child(node, "async"),
            generator: node.kind().starts_with("generator"),
        })
    }

    fn function_expression(&self, node: TsNode) -> Built {
        Ok(NodeKind::FunctionExpression {
            id: self.optional_field(node, "name")?,
            params: self.params(node)?,
            body: self.boxed_field(node, "body")?,
            is_async: has_child(node, "async"),
            generator: node.kind().starts_with("generator"),
        })
    }

    fn arrow_function(&self, node: TsNode) -> Built {
        Ok(NodeKind::ArrowFunctionExpression {
            params: match node.child_by_field_name("parameter") {
                Some(single) => vec![self.lower(single)?],
                None => self.params(node)?,
            },
            body: self.boxed_field(node, "body")?,
            is_async: has_child(node, "async"),
        })
    }

    fn array(&self, node: TsNode) -> Built {
        Ok(NodeKind::ArrayExpression {
            elements: self.lower_all(named(node))?,
        })
    }

    fn object(&self, node: TsNode) -> Built {
        Ok(NodeKind::ObjectExpression {
            properties: self.lower_all(named(node))?,
        })
    }

    fn pair(&self, node: TsNode) -> Built {
        let key = field(node, "key")?;
        let (key, computed) = if key.kind() == "computed_property_name" {
            (self.boxed(first_named(key)?)?, true)
        } else {
            (self.boxed(key)?, false)
        };
        Ok(NodeKind::Property {
            key,
            value: self.boxed_field(node, "value")?,
            computed,
            shorthand: false,
        })
    }

    fn shorthand_property(&self, node: TsNode) -> Built {
        let ident = Node::new(
            NodeKind::Identifier {
                name: self.text(node).to_string(),
            },
            Span::from_node(node),
        );
        Ok(NodeKind::Property {
            key: Box::new(ident.clone()),
            value: Box::new(ident),
            computed: false,
            shorthand: true,
        })
    }

    fn call_expression(&self, node: TsNode) -> Built {
        let args = field(node, "arguments")?;
        Ok(NodeKind::CallExpression {
            callee: self.boxed_field(node, "function")?,
            arguments: if args.kind() == "arguments" {
                self.lower_all(named(args))?
            } else {
                // Tagged template: the template is the only argument.
                vec![self.lower(args)?]
            },
            optional: has_child(node, "optional_chain"),
        })
    }

    fn new_expression(&self, node: TsNode) -> Built {
        Ok(NodeKind::NewExpression {
            callee: self.boxed_field(node, "constructor")?,
            arguments: match node.child_by_field_name("arguments") {
                Some(args) => self.lower_all(named(args))?,
                None => Vec::new(),
            },
        })
    }

    fn assignment(&self, node: TsNode) -> Built {
        let operator = match node.child_by_field_name("operator") {
            Some(op) => self.text(op).to_string(),
            None => "=".to_string(),
        };
        Ok(NodeKind::AssignmentExpression {
            operator,
            left: self.boxed_field(node, "left")?,
            right: self.boxed_field(node, "right")?,
        })
    }

    fn binary(&self, node: TsNode) -> Built {
        let operator = self.text(field(node, "operator")?).to_string();
        let left = self.boxed_field(node, "left")?;
        let right = self.boxed_field(node, "right")?;
        Ok(if matches!(operator.as_str(), "&&" | "||" | "??") {
            NodeKind::LogicalExpression { operator, left, right }
        } else {
            NodeKind::BinaryExpression { operator, left, right }
        })
    }

    fn unary(&self, node: TsNode) -> Built {
        Ok(NodeKind::UnaryExpression {
            operator: self.text(field(node, "operator")?).to_string(),
            argument: self.boxed_field(node, "argument")?,
            prefix: true,
        })
    }

    fn update(&self, node: TsNode) -> Built {
        let operator = field(node, "operator")?;
        let argument = field(node, "argument")?;
        Ok(NodeKind::UpdateExpression {
            operator: self.text(operator).to_string(),
            argument: self.boxed(argument)?,
            prefix: operator.start_byte() < argument.start_byte(),
        })
    }

    fn member(&self, node: TsNode) -> Built {
        Ok(NodeKind::MemberExpression {
            object: self.boxed_field(node, "object")?,
            property: self.boxed_field(node, "property")?,
            computed: false,
            optional: has_child(node, "optional_chain"),
        })
    }

    fn subscript(&self, node: TsNode) -> Built {
        Ok(NodeKind::MemberExpression {
            object: self.boxed_field(node, "object")?,
            property: self.boxed_field(node, "index")?,
            computed: true,
            optional: has_child(node, "optional_chain"),
        })
    }

    fn ternary(&self, node: TsNode) -> Built {
        Ok(NodeKind::ConditionalExpression {
            test: self.boxed_field(node, "condition")?,
            consequent: self.boxed_field(node, "consequence")?,
            alternate: self.boxed_field(node, "alternative")?,
        })
    }

    fn sequence(&self, node: TsNode) -> Built {
        let mut expressions = Vec::new();
        self.flatten_sequence(node, &mut expressions)?;
        Ok(NodeKind::SequenceExpression { expressions })
    }

    fn this(&self, _node: TsNode) -> Built {
        Ok(NodeKind::ThisExpression)
    }

    fn identifier(&self, node: TsNode) -> Built {
        Ok(NodeKind::Identifier {
            name: self.text(node).to_string(),
        })
    }

    fn literal(&self, node: TsNode) -> Built {
        let kind = match node.kind() {
            "number" => LiteralKind::Number,
            "string" => LiteralKind::String,
            "regex" => LiteralKind::RegExp,
            "null" => LiteralKind::Null,
            _ => LiteralKind::Boolean,
        };
        Ok(NodeKind::Literal {
            raw: self.text(node).to_string(),
            kind,
        })
    }

    fn other(&self, node: TsNode) -> Built {
        Ok(NodeKind::Other {
            kind: node.kind().to_string(),
            children: self.lower_all(named(node))?,
        })
    }

    fn declaration(&self, node: TsNode) -> Result<NodeKind, ParseError> {
        let keyword = match node.child_by_field_name("kind") {
            Some(k) => self.text(k),
            None => node.child(0).map(|k| self.text(k)).unwrap_or_default(),
        };
        let kind = VarKind::parse(keyword).ok_or_else(|| malformed(node, "kind"))?;
        let declarators = named(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .collect();
        Ok(NodeKind::VariableDeclaration {
            kind,
            declarations: self.lower_all(declarators)?,
        })
    }

    /// `for (init; test; update)` clauses: an empty statement is absent and
    /// an expression statement contributes only its expression.
    fn for_clause(&self, clause: Option<TsNode>) -> Result<Option<Box<Node>>, ParseError> {
        match clause {
            None => Ok(None),
            Some(n) if !n.is_named() || n.kind() == "empty_statement" => Ok(None),
            Some(n) if n.kind() == "expression_statement" => self.boxed(first_named(n)?).map(Some),
            Some(n) => self.boxed(n).map(Some),
        }
    }

    fn for_in(&self, node: TsNode) -> Result<NodeKind, ParseError> {
        let mut left = self.lower(field(node, "left")?)?;
        if let Some(keyword) = node.child_by_field_name("kind") {
            let kind = VarKind::parse(self.text(keyword)).ok_or_else(|| malformed(node, "kind"))?;
            let span = left.span;
            let declarator = Node::new(
                NodeKind::VariableDeclarator {
                    id: Box::new(left),
                    init: None,
                },
                span,
            );
            left = Node::new(
                NodeKind::VariableDeclaration {
                    kind,
                    declarations: vec![declarator],
                },
                span,
            );
        }
        let left = Box::new(left);
        let right = self.boxed_field(node, "right")?;
        let body = self.boxed_field(node, "body")?;

        let is_of = match node.child_by_field_name("operator") {
            Some(op) => self.text(op) == "of",
            None => has_child(node, "of"),
        };
        Ok(if is_of {
            NodeKind::ForOfStatement { left, right, body }
        } else {
            NodeKind::ForInStatement { left, right, body }
        })
    }

    fn params(&self, function: TsNode) -> Result<Vec<Node>, ParseError> {
        let Some(list) = function.child_by_field_name("parameters") else {
            return Ok(Vec::new());
        };
        named(list)
            .into_iter()
            .map(|param| match param.kind() {
                // TypeScript wraps each parameter with its annotation.
                "required_parameter" | "optional_parameter" => self.lower(field(param, "pattern")?),
                _ => self.lower(param),
            })
            .collect()
    }

    fn flatten_sequence(&self, node: TsNode, out: &mut Vec<Node>) -> Result<(), ParseError> {
        for child in named(node) {
            if child.kind() == "sequence_expression" {
                self.flatten_sequence(child, out)?;
            } else {
                out.push(self.lower(child)?);
            }
        }
        Ok(())
    }

    /// Quasis are the raw byte ranges between substitutions, so there is
    /// always one more quasi than expression.
    fn template(&self, node: TsNode) -> Result<NodeKind, ParseError> {
        let open = node.start_byte() + 1;
        let close = node.end_byte().saturating_sub(1).max(open);
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut cursor = open;

        for sub in named(node)
            .into_iter()
            .filter(|c| c.kind() == "template_substitution")
        {
            quasis.push(self.quasi(cursor, sub.start_byte()));
            expressions.push(self.lower(first_named(sub)?)?);
            cursor = sub.end_byte();
        }
        quasis.push(self.quasi(cursor, close.max(cursor)));

        Ok(NodeKind::TemplateLiteral { quasis, expressions })
    }

    fn quasi(&self, start: usize, end: usize) -> Node {
        let raw = String::from_utf8_lossy(&self.source[start..end]).into_owned();
        Node::new(
            NodeKind::TemplateElement { raw },
            Span::from_bytes(self.source, start, end),
        )
    }

    fn collect_comments(&self, node: TsNode, out: &mut Vec<Comment>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "comment" {
                let text = self.text(child);
                out.push(Comment {
                    text: text.to_string(),
                    block: text.starts_with("/*"),
                    span: Span::from_node(child),
                });
            } else if child.child_count() > 0 {
                self.collect_comments(child, out);
            }
        }
    }
}

/// The builder for a grammar kind. Unknown kinds become `Other`.
fn builder<'s>(kind: &str) -> Builder<'s> {
    match kind {
        "expression_statement" => Lowerer::expression_statement,
        "statement_block" => Lowerer::statement_block,
        "if_statement" => Lowerer::if_statement,
        "switch_statement" => Lowerer::switch_statement,
        "switch_case" | "switch_default" => Lowerer::switch_case,
        "variable_declaration" | "lexical_declaration" => Lowerer::declaration,
        "variable_declarator" => Lowerer::variable_declarator,
        "return_statement" => Lowerer::return_statement,

        "for_statement" => Lowerer::for_statement,
        "for_in_statement" => Lowerer::for_in,
        "while_statement" => Lowerer::while_statement,
        "do_statement" => Lowerer::do_statement,
        "try_statement" => Lowerer::try_statement,
        "catch_clause" => Lowerer::catch_clause,

        "function_declaration" | "generator_function_declaration" => Lowerer::function_declaration,
        "function_expression" | "function" | "generator_function" => Lowerer::function_expression,
        "arrow_function" => Lowerer::arrow_function,

        "array" => Lowerer::array,
        "object" => Lowerer::object,
        "pair" => Lowerer::pair,
        "shorthand_property_identifier" => Lowerer::shorthand_property,

        "call_expression" => Lowerer::call_expression,
        "new_expression" => Lowerer::new_expression,
        "assignment_expression" | "augmented_assignment_expression" => Lowerer::assignment,
        "binary_expression" => Lowerer::binary,
        "unary_expression" => Lowerer::unary,
        "update_expression" => Lowerer::update,
        "member_expression" => Lowerer::member,
        "subscript_expression" => Lowerer::subscript,
        "ternary_expression" => Lowerer::ternary,
        "sequence_expression" => Lowerer::sequence,
        "template_string" => Lowerer::template,

        "this" => Lowerer::this,
        "identifier"
        | "property_identifier"
        | "private_property_identifier"
        | "shorthand_property_identifier_pattern"
        | "statement_identifier"
        | "undefined" => Lowerer::identifier,
        "number" | "string" | "regex" | "true" | "false" | "null" => Lowerer::literal,

        _ => Lowerer::other,
    }
}

/// Named children, without comments.
fn named(node: TsNode<'_>) -> Vec<TsNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn first_named(node: TsNode<'_>) -> Result<TsNode<'_>, ParseError> {
    named(node)
        .into_iter()
        .next()
        .ok_or_else(|| malformed(node, "child"))
}

fn field<'a>(node: TsNode<'a>, name: &'static str) -> Result<TsNode<'a>, ParseError> {
    node.child_by_field_name(name)
        .ok_or_else(|| malformed(node, name))
}

fn has_child(node: TsNode, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn malformed(node: TsNode, field: &'static str) -> ParseError {
    ParseError::Malformed {
        kind: node.kind().to_string(),
        field,
    }
}
