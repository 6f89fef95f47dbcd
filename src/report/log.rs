//! Annotated terminal output.

use colored::Colorize;
use futures::future::{BoxFuture, FutureExt};

use super::{Formatter, ReportConfig};
use crate::error::ReportError;
use crate::findings::{Finding, Findings};
use crate::reconstruct::{beautify, reconstruct};

/// Verbosity-gated log output.
///
/// - 0: one line per finding
/// - 1: a commented block with type, line range and description
/// - 2: the block followed by the reconstructed code
#[derive(Debug, Clone, Copy)]
pub struct LogFormatter {
    color: bool,
}

impl LogFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn render(&self, findings: &Findings<'_>, verbosity: u8) -> String {
        let mut rows = Vec::with_capacity(findings.len());
        for finding in findings {
            match verbosity {
                0 => rows.push(summary_line(finding)),
                _ => {
                    rows.push(self.styled(&header_block(finding)));
                    if verbosity >= 2 {
                        rows.push(format!("{}\n", beautify(&reconstruct(finding))));
                    }
                }
            }
        }
        rows.join("\n")
    }

    fn styled(&self, block: &str) -> String {
        if self.color {
            block.blue().on_white().to_string()
        } else {
            block.to_string()
        }
    }
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn summary_line(finding: &Finding<'_>) -> String {
    let span = finding.span();
    let mut line = format!(
        "Type {}, Lines {} - {}",
        finding.tag(),
        span.start_line,
        span.end_line
    );
    if let Some(desc) = finding.description() {
        line.push_str(": ");
        line.push_str(desc);
    }
    line
}

fn header_block(finding: &Finding<'_>) -> String {
    let span = finding.span();
    [
        format!("// Type {}", finding.tag()),
        format!("// Lines {} - {}:", span.start_line, span.end_line),
        finding
            .description()
            .map(|d| format!("// {}\n", d))
            .unwrap_or_default(),
    ]
    .join("\n")
}

impl Formatter for LogFormatter {
    fn name(&self) -> &'static str {
        "log"
    }

    fn print<'a>(
        &'a self,
        findings: &'a Findings<'_>,
        config: &'a ReportConfig,
    ) -> BoxFuture<'a, Result<String, ReportError>> {
        let out = self.render(findings, config.verbosity);
        async move { Ok(out) }.boxed()
    }
}
