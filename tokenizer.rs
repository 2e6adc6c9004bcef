//! Per-line tokenizer.
//!
//! Each physical line of a script is tokenized independently into a sequence
//! of whitespace-delimited units, with double-quoted substrings kept as
//! single units. Index 0 of every tokenized line is a sentinel token that
//! carries only line metadata; statement handlers use it to build error
//! headers. Quote stripping and escape expansion are *not* done here - the
//! handlers apply the string-fixing helpers to raw token values later.

use std::fmt;

use crate::colour;
use crate::diagnostics::Diagnostic;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Line-metadata token at index 0 of every tokenized line.
    Sentinel,
    /// A bare word: statement keyword, variable name, operator.
    Word,
    /// A double-quoted literal, quotes and raw escapes included.
    StringLit,
    /// A bare token that parses as an integer or float.
    Number,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Sentinel => "sentinel",
            TokenKind::Word => "word",
            TokenKind::StringLit => "string",
            TokenKind::Number => "number",
        };
        write!(f, "{name}")
    }
}

/// One lexical unit plus the context needed for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The entire original source line the token came from.
    pub source_line: String,
    /// 1-based line number in the script.
    pub line_number: usize,
    /// 1-based column of the token's first character. Column 0 is
    /// reserved for the sentinel.
    pub column: usize,
    /// Raw token text, quotes and escapes untouched.
    pub value: String,
    pub kind: TokenKind,
    /// Counter of non-comment lines seen so far; `None` for blank lines.
    pub non_comment_line: Option<usize>,
}

/// Tokenize a single line of script.
///
/// Always returns at least the sentinel token; a blank line yields a
/// sentinel-only sequence so that line numbering stays aligned with the
/// raw source. Lexical problems come back as [`Diagnostic`] values.
pub fn tokenize(
    line: &str,
    line_number: usize,
    non_comment_line: Option<usize>,
) -> Result<Vec<Token>, Diagnostic> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = vec![Token {
        source_line: line.to_string(),
        line_number,
        column: 0,
        value: String::new(),
        kind: TokenKind::Sentinel,
        non_comment_line,
    }];

    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos].is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let value = match chars[pos] {
            '"' => scan_string(&chars, &mut pos, line, line_number)?,
            '\'' => {
                return Err(single_quote_error(line, line_number, start + 1));
            }
            '/' if chars.get(pos + 1) == Some(&'*') => {
                return Err(block_comment_error(line, line_number, start + 1));
            }
            _ => scan_bare(&chars, &mut pos),
        };

        let kind = classify(&value);
        tokens.push(Token {
            source_line: line.to_string(),
            line_number,
            column: start + 1,
            value,
            kind,
            non_comment_line,
        });
    }

    Ok(tokens)
}

/// Consume a double-quoted literal, validating escapes but leaving them raw.
fn scan_string(
    chars: &[char],
    pos: &mut usize,
    line: &str,
    line_number: usize,
) -> Result<String, Diagnostic> {
    let mut value = String::new();
    value.push(chars[*pos]);
    *pos += 1;

    while *pos < chars.len() {
        let ch = chars[*pos];
        if ch == '\\' {
            let escaped = chars.get(*pos + 1).copied();
            match escaped {
                Some('"') | Some('\\') | Some('n') | Some('r') | Some('t') => {
                    value.push(ch);
                    value.push(escaped.unwrap_or_default());
                    *pos += 2;
                }
                _ => {
                    return Err(invalid_escape_error(line, line_number, *pos + 1));
                }
            }
        } else if ch == '"' {
            value.push(ch);
            *pos += 1;
            return Ok(value);
        } else {
            value.push(ch);
            *pos += 1;
        }
    }

    Err(unterminated_string_error(line, line_number))
}

fn scan_bare(chars: &[char], pos: &mut usize) -> String {
    let mut value = String::new();
    while *pos < chars.len() && !chars[*pos].is_whitespace() {
        value.push(chars[*pos]);
        *pos += 1;
    }
    value
}

fn classify(value: &str) -> TokenKind {
    if value.starts_with('"') {
        TokenKind::StringLit
    } else if value.parse::<i64>().is_ok() || value.parse::<f64>().is_ok() {
        TokenKind::Number
    } else {
        TokenKind::Word
    }
}

fn unterminated_string_error(line: &str, line_number: usize) -> Diagnostic {
    Diagnostic::positioned(
        format!(
            "This line has an incomplete string. Did you forget an opening or \
             closing quotation mark? Something like the following line of code \
             will trigger this error:\n\n\t{}{}{}",
            colour::cyan("writeln "),
            colour::green("\"Hello world"),
            colour::red("_"),
        ),
        line_number,
        None,
        Some(line.to_string()),
    )
}

fn single_quote_error(line: &str, line_number: usize, column: usize) -> Diagnostic {
    Diagnostic::positioned(
        format!(
            "Your line of code uses single quotation marks instead of the \
             required double quotation marks. See the example:\n\n{}{} <- \
             (notice the lack of double quotation marks here).",
            colour::cyan("writeln "),
            colour::green("'Hello world'"),
        ),
        line_number,
        Some(column),
        Some(line.to_string()),
    )
}

fn block_comment_error(line: &str, line_number: usize, column: usize) -> Diagnostic {
    Diagnostic::positioned(
        format!(
            "Block comments are not part of the language. Comments are single \
             line and take the following form:\n\n{}",
            colour::grey(" - This is a comment."),
        ),
        line_number,
        Some(column),
        Some(line.to_string()),
    )
}

fn invalid_escape_error(line: &str, line_number: usize, column: usize) -> Diagnostic {
    Diagnostic::positioned(
        format!(
            "You've included an invalid character escape. You need to use one \
             of the following: {} (for a new line), {} (for a carriage \
             return), {} (for tab indentation), {} or {}.",
            colour::magenta("\\n"),
            colour::magenta("\\r"),
            colour::magenta("\\t"),
            colour::magenta("\\\""),
            colour::magenta("\\\\"),
        ),
        line_number,
        Some(column),
        Some(line.to_string()),
    )
}
