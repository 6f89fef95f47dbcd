//! Plain text rows.

use futures::future::{BoxFuture, FutureExt};

use super::{Formatter, ReportConfig};
use crate::error::ReportError;
use crate::findings::Findings;

/// Three rows per finding: type, line range, and description (or blank).
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn render(findings: &Findings<'_>) -> String {
        let mut rows = Vec::with_capacity(findings.len() * 3);
        for finding in findings {
            let span = finding.span();
            rows.push(format!("Type {}", finding.tag()));
            rows.push(format!("Lines {}-{}", span.start_line, span.end_line));
            rows.push(
                finding
                    .description()
                    .map(|d| format!("{}\n", d))
                    .unwrap_or_default(),
            );
        }
        rows.join("\n")
    }
}

impl Formatter for TextFormatter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn print<'a>(
        &'a self,
        findings: &'a Findings<'_>,
        _config: &'a ReportConfig,
    ) -> BoxFuture<'a, Result<String, ReportError>> {
        let out = Self::render(findings);
        async move { Ok(out) }.boxed()
    }
}
