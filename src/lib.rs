//! patternscan - functional pattern analysis for JavaScript.
//!
//! patternscan parses a source file, walks its syntax tree with a
//! kind-dispatched engine, and collects findings wherever a rule handler
//! matches. Findings are rendered by pluggable formatters that reconstruct
//! the offending code for display.
//!
//! # Architecture
//!
//! - `ast`: The closed node model, spans and comments
//! - `parser`: tree-sitter parsers lowering into the node model
//! - `visit`: Traversal engine and handler registry
//! - `findings`: Finding records produced by handlers
//! - `rules`: Stock rules installed into a registry
//! - `reconstruct`: Source reconstruction and beautifying for display
//! - `report`: Output formatting (text, log, HTML, JSON)
//! - `pipeline`: Acquisition, parse, traversal and formatting
//! - `config`: YAML configuration schema
//!
//! # Writing a Rule
//!
//! Register a handler for the node kind to inspect. A handler replaces the
//! structural default for its kind, so call [`visit::Engine::descend`] to
//! keep walking, or use [`visit::Registry::chain`] to run before it.

pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod findings;
pub mod parser;
pub mod pipeline;
pub mod reconstruct;
pub mod report;
pub mod rules;
pub mod visit;

pub use ast::{Node, NodeKind, NodeType, Span};
pub use config::Config;
pub use error::{AnalysisError, ReportError};
pub use findings::{Finding, Findings};
pub use parser::{for_extension, init as init_parsers, ParseError, Parser};
pub use pipeline::{Analyzer, Outcome, Pipeline, Report, Source, NO_RESULTS};
pub use reconstruct::{beautify, reconstruct};
pub use report::{Formatter, ReportConfig};
pub use rules::Rule;
pub use visit::{handler, Engine, Handler, Registry};
