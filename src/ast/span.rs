//! Source locations attached to every node.

use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Create a span from raw byte offsets into `source`.
    ///
    /// Used for fragments tree-sitter does not expose as nodes of their own,
    /// such as the literal segments of a template string.
    pub fn from_bytes(source: &[u8], start_byte: usize, end_byte: usize) -> Self {
        let (start_line, start_col) = line_col(source, start_byte);
        let (end_line, end_col) = line_col(source, end_byte);
        Self {
            start_byte,
            end_byte,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Number of lines covered by this span.
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

fn line_col(source: &[u8], offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    (line, offset - line_start + 1)
}

/// A source comment, retained on the program node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text including its delimiters.
    pub text: String,
    /// `true` for `/* */` comments.
    pub block: bool,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_tracks_lines() {
        let source = b"let a = 1;\nlet b = `x${a}y`;\n";
        let start = 19; // the opening backtick on line 2
        let span = Span::from_bytes(source, start, start + 1);
        assert_eq!(span.start_line, 2);
        assert_eq!(span.start_col, 9);
        assert_eq!(span.line_count(), 1);
    }

    #[test]
    fn test_display() {
        let span = Span {
            start_line: 3,
            start_col: 7,
            ..Default::default()
        };
        assert_eq!(span.to_string(), "3:7");
    }
}
