//! Fatal diagnostic values.
//!
//! Every diagnosed condition in the interpreter is fatal: there is no local
//! recovery and no continuation after an error. Rather than printing and
//! exiting from deep inside the tokenizer or a statement handler, each layer
//! returns a [`Diagnostic`] and propagates it with `?`. The binary's driver
//! is the only place that renders the block and terminates the process.

use std::fmt;

use crate::colour;

/// Line/column context attached to a positioned diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// 1-based line number in the script.
    pub line: usize,
    /// 1-based column of the offending token; `None` degrades the
    /// diagnostic to line-only context.
    pub column: Option<usize>,
    /// The full source line, echoed back under the header.
    pub source_line: Option<String>,
}

/// A fatal error report. Rendering happens through `Display`; the process
/// exit itself is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub context: Option<SourceContext>,
}

impl Diagnostic {
    /// A diagnostic with no line or column context, for script-level
    /// problems such as a misplaced `minver` directive.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// A diagnostic tied to a line and, where known, a column.
    pub fn positioned(
        message: impl Into<String>,
        line: usize,
        column: Option<usize>,
        source_line: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            context: Some(SourceContext {
                line,
                column,
                source_line,
            }),
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.context.as_ref().map(|ctx| ctx.line)
    }
}

const LOC_TITLE: &str = "Line of Code: ";

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = match &self.context {
            None => "[Error]".to_string(),
            Some(ctx) => match ctx.column {
                None => format!("[Error on line {}]", ctx.line),
                Some(column) => format!("[Error on line {}, position {}]", ctx.line, column),
            },
        };
        writeln!(f, "\n{}", colour::red(&header))?;

        if let Some(ctx) = &self.context {
            if let Some(source_line) = &ctx.source_line {
                writeln!(f, "{}{}", colour::magenta(LOC_TITLE), source_line)?;
                if let Some(column) = ctx.column {
                    // Caret sits under the first character of the token.
                    let pad = LOC_TITLE.len() + column.saturating_sub(1);
                    writeln!(f, "{}{}", " ".repeat(pad), colour::red("^"))?;
                }
            }
        }

        writeln!(f, "\n{}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
