//! Script preprocessing.
//!
//! Runs once over the whole script before any line is tokenized: comment
//! stripping (line-count-preserving) and validation of the `minver`
//! directive's placement and cardinality. The compatibility side of
//! `minver` - comparing the declared version against the interpreter - is
//! the statement handler's job at dispatch time.

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::{SHEBANG_MARKER, SYMBOL_COMMENT};

/// Placeholder a comment line is replaced with.
const COMMENT_PLACEHOLDER: &str = "-";
/// Placeholder a blank line is replaced with.
const BLANK_PLACEHOLDER: &str = " ";

/// Replace comment lines with the bare comment symbol and blank lines with
/// a single space. The output always has the same length as the input so
/// that line numbers in diagnostics keep matching the raw source, and the
/// comment text itself can never trigger a lexical error downstream.
pub fn strip_comments(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                BLANK_PLACEHOLDER.to_string()
            } else if trimmed.starts_with(SYMBOL_COMMENT) {
                COMMENT_PLACEHOLDER.to_string()
            } else {
                line.clone()
            }
        })
        .collect()
}

/// Check that `minver`, if present at all, appears exactly once and as the
/// first statement of the script (or the second, behind a shebang line).
/// Expects the lines to have been through [`strip_comments`] already.
pub fn validate_minver(lines: &[String]) -> Result<(), Diagnostic> {
    // First word of every line that is neither a comment nor blank.
    let statement_names: Vec<&str> = lines
        .iter()
        .filter(|line| line.as_str() != COMMENT_PLACEHOLDER && line.as_str() != BLANK_PLACEHOLDER)
        .filter_map(|line| line.trim().split_whitespace().next())
        .collect();

    let minver_count = statement_names
        .iter()
        .filter(|name| **name == "minver")
        .count();

    match minver_count {
        0 => Ok(()),
        1 => {
            let first_is_minver = statement_names.first() == Some(&"minver");
            let second_behind_shebang = statement_names.get(1) == Some(&"minver")
                && statement_names
                    .first()
                    .is_some_and(|name| name.starts_with(SHEBANG_MARKER));
            if first_is_minver || second_behind_shebang {
                Ok(())
            } else {
                Err(Diagnostic::general(format!(
                    "The {} statement needs to be the first line of the script. \
                     This helps to ensure that the script is able to execute and \
                     doesn't fail part of the way through. Move your {} statement \
                     to the top of the script.",
                    colour::cyan("minver"),
                    colour::cyan("minver"),
                )))
            }
        }
        count => Err(Diagnostic::general(format!(
            "There are multiple {} calls in your script, specifically {}. \
             Ensure that you only have one and ensure that it is the first \
             line of your script.",
            colour::cyan("minver"),
            count,
        ))),
    }
}

/// Whether a raw source line is a shebang line (`#!<interpreter-path>`).
pub fn is_shebang(line: &str) -> bool {
    line.starts_with(SHEBANG_MARKER)
}
