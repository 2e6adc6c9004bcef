//! Interpreter context and per-line driving loop.
//!
//! The engine owns everything that used to be ambient state: the variable
//! store, the statement registry, the shebang flag, and the mode switches.
//! `run` statements re-enter [`Engine::run_file`] against the same engine,
//! so nested scripts share variables with their caller (dynamic, not
//! lexical, scoping across script boundaries).

use std::fs;
use std::path::Path;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::preprocessor;
use crate::statements::Registry;
use crate::tokenizer::{tokenize, Token};
use crate::variables::VarStore;

/// How many `run` levels may be stacked before the engine refuses to
/// recurse further. Keeps a script that runs itself from exhausting the
/// call stack.
pub const MAX_RUN_DEPTH: usize = 16;

/// Whether execution continues after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The `exit` statement (or the end of an exiting sub-script).
    Exit,
}

/// What a statement handler produced: an optional value (the variable
/// set, the text written) and the resulting control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub value: Option<String>,
    pub flow: Flow,
}

impl Outcome {
    pub fn empty() -> Self {
        Self {
            value: None,
            flow: Flow::Continue,
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            flow: Flow::Continue,
        }
    }

    pub fn exit() -> Self {
        Self {
            value: None,
            flow: Flow::Exit,
        }
    }
}

/// Mode switches set from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Narrate each statement as it executes.
    pub verbose: bool,
    /// Gate for the `execute` statement.
    pub allow_exec: bool,
    /// Dump tokens instead of executing statements.
    pub dev: bool,
}

/// The interpreter context threaded through tokenizing and dispatch.
pub struct Engine {
    pub vars: VarStore,
    pub options: EngineOptions,
    /// One-way flag: set when a shebang line is seen, never reset. The
    /// `minver` placement check tolerates line 2 once this is set.
    pub shebang_present: bool,
    registry: Registry,
    run_depth: usize,
    /// Every token produced during the run, kept for `--dev` introspection.
    token_log: Vec<Token>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            vars: VarStore::new(),
            options,
            shebang_present: false,
            registry: Registry::standard(),
            run_depth: 0,
            token_log: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn token_log(&self) -> &[Token] {
        &self.token_log
    }

    pub fn run_depth(&self) -> usize {
        self.run_depth
    }

    pub fn enter_run(&mut self) {
        self.run_depth += 1;
    }

    pub fn leave_run(&mut self) {
        self.run_depth = self.run_depth.saturating_sub(1);
    }

    /// Load a script from disk and execute it: read, strip comments,
    /// validate the `minver` directive, then walk the lines.
    pub fn run_file(&mut self, path: &Path) -> Result<Flow, Diagnostic> {
        let source = fs::read_to_string(path).map_err(|_| {
            Diagnostic::general(format!(
                "Unknown file: {}.",
                colour::magenta(&path.display().to_string())
            ))
        })?;
        let lines: Vec<String> = source.lines().map(str::to_string).collect();
        self.run_source(&lines)
    }

    /// Preprocess and execute a script given as raw lines.
    pub fn run_source(&mut self, lines: &[String]) -> Result<Flow, Diagnostic> {
        let prepared = preprocessor::strip_comments(lines);
        preprocessor::validate_minver(&prepared)?;
        self.run_lines(&prepared)
    }

    /// Execute preprocessed lines one at a time. Comment placeholders are
    /// skipped outright; blank lines (the preprocessor's space placeholder
    /// or a genuinely empty string) are still tokenized (sentinel-only) so
    /// line numbering stays aligned with the raw source, but they carry no
    /// non-comment counter and do not advance it.
    pub fn run_lines(&mut self, lines: &[String]) -> Result<Flow, Diagnostic> {
        let mut non_comment_line = 1;
        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                let tokens = tokenize(" ", line_number, None)?;
                self.token_log.extend(tokens);
                continue;
            }
            if line.starts_with(crate::SYMBOL_COMMENT) {
                continue;
            }

            let tokens = tokenize(line, line_number, Some(non_comment_line))?;
            non_comment_line += 1;
            self.token_log.extend(tokens.iter().cloned());

            if self.options.dev {
                print_token_info(&tokens);
                continue;
            }
            let outcome = self.dispatch(&tokens)?;
            if outcome.flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Route one tokenized line to its statement handler.
    pub fn dispatch(&mut self, tokens: &[Token]) -> Result<Outcome, Diagnostic> {
        // Statements read the clock through reserved variables, so the
        // per-tick entries are refreshed before every statement call.
        self.vars.refresh_reserved();

        // A sentinel-only line is a blank (or comment-equivalent) no-op.
        if tokens.len() <= 1 {
            return Ok(Outcome::empty());
        }

        if preprocessor::is_shebang(&tokens[0].source_line) {
            self.shebang_present = true;
            return Ok(Outcome::empty());
        }

        let name = tokens[1].value.as_str();
        match self.registry.get(name) {
            Some(handler) => handler(tokens, self),
            None => Err(Diagnostic::positioned(
                format!(
                    "The statement passed - {} - is not a valid statement. \
                     Valid statements include {}.",
                    colour::yellow(name),
                    self.registry.listing(),
                ),
                tokens[0].line_number,
                Some(tokens[1].column),
                Some(tokens[0].source_line.clone()),
            )),
        }
    }
}

/// Token dump for `--dev` runs.
fn print_token_info(tokens: &[Token]) {
    for token in tokens {
        println!(
            "{} line {:>3} col {:>3} {:>8}  {}",
            colour::cyan("::"),
            token.line_number,
            token.column,
            token.kind.to_string(),
            token.value,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(EngineOptions::default())
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_and_comment_lines_are_no_ops() {
        let mut engine = engine();
        let flow = engine
            .run_source(&lines(&["- greeting script", "", "set name = \"Bistro\""]))
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(engine.vars.get("name"), Some("Bistro"));
    }

    #[test]
    fn unknown_statement_lists_valid_names() {
        let mut engine = engine();
        let err = engine
            .run_source(&lines(&["frobnicate \"x\""]))
            .unwrap_err();
        assert!(err.message.contains("not a valid statement"));
        assert!(err.message.contains("writeln"));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn shebang_sets_the_one_way_flag() {
        let mut engine = engine();
        engine
            .run_source(&lines(&["#!/usr/bin/bistro", "minver 1"]))
            .unwrap();
        assert!(engine.shebang_present);
    }

    #[test]
    fn exit_stops_the_run() {
        let mut engine = engine();
        let flow = engine
            .run_source(&lines(&["set first = \"1\"", "exit", "set second = \"2\""]))
            .unwrap();
        assert_eq!(flow, Flow::Exit);
        assert_eq!(engine.vars.get("first"), Some("1"));
        assert_eq!(engine.vars.get("second"), None);
    }

    #[test]
    fn dispatch_refreshes_reserved_variables() {
        let mut engine = engine();
        engine
            .run_source(&lines(&["set today = \"#b_date_ymd\""]))
            .unwrap();
        let today = engine.vars.get("today").unwrap();
        assert!(!today.is_empty());
        assert!(!today.contains('#'));
    }

    #[test]
    fn token_log_accumulates_sentinels_for_blanks() {
        let mut engine = engine();
        engine
            .run_source(&lines(&["", "writeln \"hi\""]))
            .unwrap();
        let sentinels = engine
            .token_log()
            .iter()
            .filter(|token| token.kind == crate::tokenizer::TokenKind::Sentinel)
            .count();
        assert_eq!(sentinels, 2);
    }

    #[test]
    fn blank_lines_carry_no_non_comment_counter() {
        let mut engine = engine();
        engine
            .run_source(&lines(&["set first = \"1\"", "", "set second = \"2\""]))
            .unwrap();
        let blank = engine
            .token_log()
            .iter()
            .find(|token| token.line_number == 2)
            .unwrap();
        assert_eq!(blank.kind, crate::tokenizer::TokenKind::Sentinel);
        assert_eq!(blank.non_comment_line, None);

        // The counter skips blanks: line 3 is the second non-comment line.
        let second = engine
            .token_log()
            .iter()
            .find(|token| token.line_number == 3)
            .unwrap();
        assert_eq!(second.non_comment_line, Some(2));
    }

    #[test]
    fn set_arity_mismatch_is_positioned() {
        let mut engine = engine();
        let err = engine.run_source(&lines(&["set name"])).unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert!(err.message.contains("set"));
        assert!(err.message.contains("[value]"));
    }
}
