//! Static HTML report written to disk.

use futures::future::{BoxFuture, FutureExt};

use super::{Formatter, ReportConfig};
use crate::error::ReportError;
use crate::findings::Findings;
use crate::reconstruct::{beautify, reconstruct};

const STYLE: &str = r#"
* { margin: 0; padding: 0; }
body { font-family: sans-serif; padding: 20px 0; }
h3 { margin: 0 40px 20px; }
p.lines { background: #ddd; border: 1px solid #000; margin: 10px; padding: 10px; }
p.lines span { font-weight: bold; }
div.code { background: #207ab2; color: #eab560; font-family: monospace; margin: 0 40px; padding: 10px 10px 10px 50px; }
"#;

/// Writes `<destination>/<basename>_suite.html` and reports success as a
/// status line.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl HtmlFormatter {
    pub fn render(findings: &Findings<'_>, filename: &str) -> String {
        let mut rows = String::new();
        for finding in findings {
            let span = finding.span();
            rows.push_str(&format!(
                "<p class=\"lines\">Type <span>{}</span>, Lines {} - {}</p>\n",
                escape(finding.tag()),
                span.start_line,
                span.end_line
            ));
            if let Some(desc) = finding.description() {
                rows.push_str(&format!(
                    "<p class=\"lines\"><span>{}</span></p>\n",
                    escape(desc)
                ));
            }
            rows.push_str(&format!(
                "<div class=\"code\"><pre>{}</pre></div>\n",
                escape(&beautify(&reconstruct(finding)))
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{name}</title>\n<style>{style}</style>\n</head>\n<body>\n<h3>Functional pattern analysis of file {name}</h3>\n{rows}</body>\n</html>\n",
            name = escape(filename),
            style = STYLE,
            rows = rows
        )
    }
}

impl Formatter for HtmlFormatter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn print<'a>(
        &'a self,
        findings: &'a Findings<'_>,
        config: &'a ReportConfig,
    ) -> BoxFuture<'a, Result<String, ReportError>> {
        let document = Self::render(findings, &config.filename);
        let path = config
            .destination
            .join(format!("{}_suite.html", config.basename()));

        async move {
            tracing::debug!(path = %path.display(), "writing html report");
            tokio::fs::write(&path, document)
                .await
                .map_err(|source| ReportError::Write {
                    path: path.clone(),
                    source,
                })?;
            Ok(format!(
                "Functional pattern analysis of {} completed successfully.",
                config.filename
            ))
        }
        .boxed()
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
