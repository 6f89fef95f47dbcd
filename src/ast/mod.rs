//! Syntax tree model consumed by the traversal engine and the reconstructor.
//!
//! Trees are produced by the [`parser`](crate::parser) layer, which lowers a
//! tree-sitter concrete syntax tree into this closed, ESTree-shaped model:
//!
//! - [`Node`]: span plus a kind-specific [`NodeKind`] payload
//! - [`NodeType`]: fieldless tag used as the handler registry key
//! - [`Span`], [`Comment`]: source location data
//!
//! Constructs outside the supported subset are kept as [`NodeKind::Other`],
//! carrying their grammar kind and lowered children.

mod node;
mod span;

pub use node::{LiteralKind, Node, NodeKind, NodeType, VarKind};
pub use span::{Comment, Span};
