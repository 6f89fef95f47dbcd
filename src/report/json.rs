//! JSON output.

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use super::{Formatter, ReportConfig};
use crate::error::ReportError;
use crate::findings::{Finding, Findings};
use crate::reconstruct::reconstruct;

/// JSON report structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub file: String,
    pub count: usize,
    pub findings: Vec<JsonFinding>,
}

/// JSON finding structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFinding {
    pub tag: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub start_col: usize,
    pub end_col: usize,
    /// Reconstructed code, only at verbosity 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl JsonFinding {
    fn from_finding(finding: &Finding<'_>, with_source: bool) -> Self {
        let span = finding.span();
        Self {
            tag: finding.tag().to_string(),
            kind: finding.node().kind_name().to_string(),
            description: finding.description().map(str::to_string),
            start_line: span.start_line,
            end_line: span.end_line,
            start_col: span.start_col,
            end_col: span.end_col,
            source: with_source.then(|| reconstruct(finding)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn report(findings: &Findings<'_>, config: &ReportConfig) -> JsonReport {
        let with_source = config.verbosity >= 2;
        JsonReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            file: config.filename.clone(),
            count: findings.len(),
            findings: findings
                .iter()
                .map(|f| JsonFinding::from_finding(f, with_source))
                .collect(),
        }
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn print<'a>(
        &'a self,
        findings: &'a Findings<'_>,
        config: &'a ReportConfig,
    ) -> BoxFuture<'a, Result<String, ReportError>> {
        let out = serde_json::to_string_pretty(&Self::report(findings, config))
            .map_err(ReportError::from);
        async move { out }.boxed()
    }
}
