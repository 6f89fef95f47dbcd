//! Minimal brace/semicolon indenter for reconstructed code.
//!
//! Reconstructed text is a single line. For reports it is broken after `{`
//! and `;`, before `}`, and indented four spaces per open brace. Quoted
//! string and template contents are copied untouched.

const INDENT: &str = "    ";

/// Lay out reconstructed code over multiple indented lines.
pub fn beautify(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len() + 16);
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '(' => {
                parens += 1;
                out.push(c);
            }
            ')' => {
                parens = parens.saturating_sub(1);
                out.push(c);
            }
            '{' => {
                let next = next_significant(&chars, i + 1);
                if next.map(|j| chars[j]) == Some('}') {
                    // Empty braces stay inline.
                    out.push_str("{}");
                    i = next.map(|j| j + 1).unwrap_or(chars.len());
                    continue;
                }
                out.push('{');
                depth += 1;
                newline(&mut out, depth);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                trim_line_end(&mut out);
                if !current_line(&out).trim().is_empty() {
                    newline(&mut out, depth);
                } else {
                    reindent(&mut out, depth);
                }
                out.push('}');
                match next_significant(&chars, i + 1).map(|j| chars[j]) {
                    Some(';') | Some(',') | Some(')') | Some(']') | None => {}
                    Some(_) if starts_with_word(&chars, i + 1, "else") => out.push(' '),
                    Some(_) => newline(&mut out, depth),
                }
                i = skip_spaces(&chars, i + 1);
                continue;
            }
            ';' => {
                out.push(';');
                if parens == 0 {
                    match next_significant(&chars, i + 1).map(|j| chars[j]) {
                        Some('}') | None => {}
                        Some(_) => newline(&mut out, depth),
                    }
                    i = skip_spaces(&chars, i + 1);
                    continue;
                }
            }
            ' ' if current_line(&out).trim().is_empty() => {}
            _ => out.push(c),
        }
        i += 1;
    }

    trim_line_end(&mut out);
    out
}

fn newline(out: &mut String, depth: usize) {
    trim_line_end(out);
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn reindent(out: &mut String, depth: usize) {
    let start = out.rfind('\n').map(|p| p + 1).unwrap_or(0);
    out.truncate(start);
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn trim_line_end(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
}

fn current_line(out: &str) -> &str {
    match out.rfind('\n') {
        Some(p) => &out[p + 1..],
        None => out,
    }
}

fn next_significant(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len()).find(|&j| !chars[j].is_whitespace())
}

fn skip_spaces(chars: &[char], from: usize) -> usize {
    next_significant(chars, from).unwrap_or(chars.len())
}

fn starts_with_word(chars: &[char], from: usize, word: &str) -> bool {
    let start = skip_spaces(chars, from);
    let candidate: String = chars[start..].iter().take(word.len()).collect();
    candidate == word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_body_is_indented() {
        let code = "function add { let c = a + b;return c; }";
        assert_eq!(
            beautify(code),
            "function add {\n    let c = a + b;\n    return c;\n}"
        );
    }

    #[test]
    fn test_else_stays_on_closing_line() {
        let code = "if (a) { return 1; } else { return 2; }";
        assert_eq!(
            beautify(code),
            "if (a) {\n    return 1;\n} else {\n    return 2;\n}"
        );
    }

    #[test]
    fn test_for_header_semicolons_stay_inline() {
        let code = "for (let i = 0; i < n; i ++) { f(i); }";
        assert_eq!(
            beautify(code),
            "for (let i = 0; i < n; i ++) {\n    f(i);\n}"
        );
    }

    #[test]
    fn test_strings_are_untouched() {
        assert_eq!(beautify("f(\"{ ; }\")"), "f(\"{ ; }\")");
        assert_eq!(beautify("x = {}"), "x = {}");
    }

    #[test]
    fn test_nested_blocks() {
        let code = "function f { if (a) { return 1; };return 2; }";
        assert_eq!(
            beautify(code),
            "function f {\n    if (a) {\n        return 1;\n    };\n    return 2;\n}"
        );
    }
}
