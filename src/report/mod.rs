//! Output formatting for findings.
//!
//! Supports four output formats:
//! - Text: plain rows of type, line range and description
//! - Log: annotated terminal output, gated by verbosity
//! - HTML: a static document written to the destination directory
//! - JSON: structured output for programmatic consumption
//!
//! Formatters are asynchronous because some of them write files.

mod html;
mod json;
mod log;
mod text;

pub use html::HtmlFormatter;
pub use json::{JsonFinding, JsonFormatter, JsonReport};
pub use log::LogFormatter;
pub use text::TextFormatter;

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

use crate::config::{OutputFormat, ReportSettings};
use crate::error::ReportError;
use crate::findings::Findings;

/// Options handed to a formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// 0 = one line per finding, 1 = annotated block, 2 = block plus code.
    pub verbosity: u8,
    /// Output directory for file-emitting formatters.
    pub destination: PathBuf,
    /// Name of the analyzed file, used in headers and output file names.
    pub filename: String,
}

impl ReportConfig {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &ReportSettings, filename: impl Into<String>) -> Self {
        Self {
            verbosity: settings.verbosity,
            destination: settings.destination.clone(),
            filename: filename.into(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Final path component of `filename`.
    pub fn basename(&self) -> String {
        Path::new(&self.filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.clone())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbosity: 1,
            destination: PathBuf::from("."),
            filename: String::new(),
        }
    }
}

/// Turns an ordered findings sequence into a report.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render `findings`. The returned string is the report itself, or a
    /// status line for formatters that write elsewhere.
    fn print<'a>(
        &'a self,
        findings: &'a Findings<'_>,
        config: &'a ReportConfig,
    ) -> BoxFuture<'a, Result<String, ReportError>>;
}

/// The formatter for `format`. `color` only affects the log formatter.
pub fn formatter_for(format: OutputFormat, color: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Log => Box::new(LogFormatter::new().with_color(color)),
        OutputFormat::Html => Box::new(HtmlFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::ast::Node;
    use crate::parser::languages::javascript;

    /// A parsed program with one function spanning lines 2 to 5.
    pub fn sample_tree() -> Node {
        let source = "\nfunction f(a) {\n    if (a) { return 1; }\n    return 2;\n}\n";
        javascript::new_parser().parse(source).unwrap()
    }

    /// The first top-level statement of `tree`.
    pub fn first(tree: &Node) -> &Node {
        tree.children()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        let config = ReportConfig::new("src/lib/app.js");
        assert_eq!(config.basename(), "app.js");
        assert_eq!(ReportConfig::new("app.js").basename(), "app.js");
    }

    #[test]
    fn test_from_settings() {
        let settings = ReportSettings {
            verbosity: 2,
            destination: PathBuf::from("out"),
            ..ReportSettings::default()
        };
        let config = ReportConfig::from_settings(&settings, "a.js");
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.destination, PathBuf::from("out"));
        assert_eq!(config.filename, "a.js");
    }

    #[test]
    fn test_formatter_for() {
        for format in OutputFormat::ALL {
            assert_eq!(formatter_for(format, false).name(), format.as_str());
        }
    }
}
