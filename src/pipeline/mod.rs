//! Acquisition, parse, traversal and formatting, in that order.
//!
//! ```text
//! Source ──read──▶ text ──parse──▶ Node ──Engine──▶ Findings ──Formatter──▶ report
//!                                                      │
//!                                                      └─ empty ──▶ NO_RESULTS
//! ```
//!
//! Findings borrow the tree they were found in, so [`Analyzer`] keeps
//! parsing and traversal as separate steps and the caller owns the tree in
//! between.

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use crate::ast::Node;
use crate::error::AnalysisError;
use crate::findings::Findings;
use crate::parser::{self, languages::javascript, Parser};
use crate::report::{Formatter, ReportConfig};
use crate::rules::{self, Rule};
use crate::visit::{Engine, Registry};

/// Status reported when traversal produces nothing.
pub const NO_RESULTS: &str = "No results found";

/// Where source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    Text(String),
}

impl Source {
    /// `-` means standard input, anything else is a file path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            Source::Stdin
        } else {
            Source::File(arg.to_path_buf())
        }
    }

    /// Name used in report headers and output file names.
    pub fn display_name(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Stdin => "stdin".to_string(),
            Source::Text(_) => "input".to_string(),
        }
    }

    /// File extension with its leading dot, if the source is a file.
    pub fn extension(&self) -> Option<String> {
        match self {
            Source::File(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e)),
            _ => None,
        }
    }
}

/// Read the whole source text.
pub async fn read_source(source: &Source) -> Result<String, AnalysisError> {
    match source {
        Source::File(path) => {
            tracing::debug!("Reading file {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| AnalysisError::SourceRead {
                    path: path.clone(),
                    source,
                })
        }
        Source::Stdin => {
            tracing::debug!("Reading standard input");
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|source| AnalysisError::SourceRead {
                    path: PathBuf::from("-"),
                    source,
                })?;
            Ok(text)
        }
        Source::Text(text) => Ok(text.clone()),
    }
}

/// Result of traversing one tree.
#[derive(Debug)]
pub enum Outcome<'t> {
    Findings(Findings<'t>),
    Empty,
}

impl<'t> Outcome<'t> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    /// The findings, if there are any.
    pub fn findings(&self) -> Option<&Findings<'t>> {
        match self {
            Outcome::Findings(findings) => Some(findings),
            Outcome::Empty => None,
        }
    }
}

/// A parser paired with an engine.
pub struct Analyzer {
    engine: Engine,
    parser: Box<dyn Parser>,
}

impl Analyzer {
    pub fn new(registry: Registry, parser: Box<dyn Parser>) -> Self {
        Self {
            engine: Engine::new(registry),
            parser,
        }
    }

    /// A JavaScript analyzer with `rules` installed over the structural defaults.
    pub fn with_rules(rules: &[Box<dyn Rule>]) -> Self {
        Self::new(rules::registry(rules), javascript::new_parser())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Parse `text`. Any parser failure becomes [`AnalysisError::InvalidSource`].
    pub fn parse(&self, text: &str) -> Result<Node, AnalysisError> {
        tracing::debug!("Parsing {} source", self.parser.language());
        self.parser.parse(text).map_err(|e| {
            tracing::debug!(error = %e, "parse failed");
            AnalysisError::InvalidSource
        })
    }

    /// Traverse `tree` and collect findings.
    pub fn analyze<'t>(&self, tree: &'t Node) -> Outcome<'t> {
        let findings = self.engine.run(tree);
        tracing::debug!("Captured {} nodes", findings.len());
        if findings.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Findings(findings)
        }
    }

    /// Parse and analyze `text`, handing the outcome to `consume` while the
    /// tree is still alive.
    pub fn run_analysis<R>(
        &self,
        text: &str,
        consume: impl FnOnce(Outcome<'_>) -> R,
    ) -> Result<R, AnalysisError> {
        let tree = self.parse(text)?;
        Ok(consume(self.analyze(&tree)))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::with_rules(&rules::from_config(&Default::default()))
    }
}

/// What a pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Nothing matched; no formatter was invoked.
    Empty,
    Rendered { findings: usize, output: String },
}

impl Report {
    /// The rendered report, or [`NO_RESULTS`].
    pub fn output(&self) -> &str {
        match self {
            Report::Empty => NO_RESULTS,
            Report::Rendered { output, .. } => output,
        }
    }

    pub fn finding_count(&self) -> usize {
        match self {
            Report::Empty => 0,
            Report::Rendered { findings, .. } => *findings,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Report::Empty)
    }
}

/// Builder for a single analysis run.
#[derive(Default)]
pub struct Pipeline {
    source: Option<Source>,
    formatter: Option<Box<dyn Formatter>>,
    registry: Option<Registry>,
    parser: Option<Box<dyn Parser>>,
    config: Option<ReportConfig>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Handlers to traverse with. Defaults to the structural registry.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Parser to use. Defaults to the one registered for the source's
    /// extension, then to JavaScript.
    pub fn parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Formatter options. An empty `filename` is filled from the source.
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Run acquisition, parse, traversal and formatting.
    pub async fn run(self) -> Result<Report, AnalysisError> {
        let source = self.source.ok_or(AnalysisError::MissingInput("No file given"))?;
        let formatter = self
            .formatter
            .ok_or(AnalysisError::MissingInput("No generator given"))?;

        let text = read_source(&source).await?;

        let parser = match self.parser {
            Some(parser) => parser,
            None => source
                .extension()
                .and_then(|ext| parser::for_extension(&ext))
                .unwrap_or_else(javascript::new_parser),
        };
        let analyzer = Analyzer::new(self.registry.unwrap_or_else(Registry::builtin), parser);
        let tree = analyzer.parse(&text)?;

        let mut config = self.config.unwrap_or_default();
        if config.filename.is_empty() {
            config.filename = source.display_name();
        }

        match analyzer.analyze(&tree) {
            Outcome::Empty => {
                tracing::info!("Exiting without printing");
                Ok(Report::Empty)
            }
            Outcome::Findings(findings) => {
                tracing::debug!("Printing with {} formatter", formatter.name());
                let output = formatter.print(&findings, &config).await?;
                Ok(Report::Rendered {
                    findings: findings.len(),
                    output,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextFormatter;

    #[test]
    fn test_source_from_arg() {
        assert_eq!(Source::from_arg(Path::new("-")), Source::Stdin);
        let source = Source::from_arg(Path::new("src/app.ts"));
        assert_eq!(source.extension().as_deref(), Some(".ts"));
        assert_eq!(source.display_name(), "src/app.ts");
        assert_eq!(Source::Text("x".into()).extension(), None);
    }

    #[tokio::test]
    async fn test_missing_source() {
        let err = Pipeline::new()
            .formatter(Box::new(TextFormatter))
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No file given");
    }

    #[tokio::test]
    async fn test_missing_formatter_before_reading() {
        // The file does not exist: the formatter check must come first.
        let err = Pipeline::new()
            .source(Source::File(PathBuf::from("/nonexistent/file.js")))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInput("No generator given")));
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let err = Pipeline::new()
            .source(Source::File(PathBuf::from("/nonexistent/file.js")))
            .formatter(Box::new(TextFormatter))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SourceRead { .. }));
    }

    #[tokio::test]
    async fn test_builtin_registry_finds_nothing() {
        let report = Pipeline::new()
            .source(Source::Text("function f(a) { return a; }".into()))
            .formatter(Box::new(TextFormatter))
            .run()
            .await
            .unwrap();
        assert_eq!(report, Report::Empty);
        assert_eq!(report.output(), NO_RESULTS);
    }

    #[test]
    fn test_run_analysis_scopes_findings() {
        let analyzer = Analyzer::default();
        let tags = analyzer
            .run_analysis("const f = (a, b, c, d) => a;", |outcome| {
                outcome
                    .findings()
                    .map(|f| f.iter().map(|f| f.tag().to_string()).collect::<Vec<_>>())
                    .unwrap_or_default()
            })
            .unwrap();
        assert_eq!(tags, vec!["TooManyParams"]);
    }

    #[test]
    fn test_invalid_source_is_normalized() {
        let analyzer = Analyzer::default();
        let err = analyzer.run_analysis("function (", |_| ()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSource));
    }

    #[test]
    fn test_overly_deep_source_is_invalid() {
        let analyzer = Analyzer::default();
        let source = format!("x = {};", vec!["1"; 10_000].join(" + "));
        let err = analyzer.run_analysis(&source, |_| ()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSource));
    }

    #[test]
    fn test_nested_source_within_limit_is_analyzed() {
        let analyzer = Analyzer::default();
        let source = format!(
            "const f = (a, b, c, d) => {};",
            vec!["a"; 100].join(" + ")
        );
        let text = analyzer
            .run_analysis(&source, |outcome| {
                outcome
                    .findings()
                    .and_then(|f| f.iter().next())
                    .map(|f| crate::reconstruct::reconstruct(f))
                    .unwrap_or_default()
            })
            .unwrap();
        assert!(text.starts_with("(a, b, c, d) => a + a"));
    }
}
