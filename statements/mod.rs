//! Statement handlers and the registry that dispatches to them.
//!
//! Every handler has the same shape: validate its own token arity, fix and
//! substitute its string arguments, do the work, and hand back an
//! [`Outcome`]. Handlers never print-and-exit; problems come back as
//! [`Diagnostic`] values like everywhere else in the engine.

use std::collections::BTreeMap;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;
use crate::{SYMBOL_ACTION, SYMBOL_ASSIGNMENT};

pub mod ask;
pub mod compress;
pub mod download;
pub mod execute;
pub mod exit;
pub mod files;
pub mod minver;
pub mod paths;
pub mod pause;
pub mod run_script;
pub mod set;
pub mod write;

/// A statement handler: full token sequence in, outcome or fatal
/// diagnostic out.
pub type StatementFn = fn(&[Token], &mut Engine) -> Result<Outcome, Diagnostic>;

/// Keyword-to-handler table, built once at engine construction. The
/// `BTreeMap` keeps the user-facing statement listing sorted for free.
pub struct Registry {
    map: BTreeMap<&'static str, StatementFn>,
}

impl Registry {
    pub fn standard() -> Self {
        let mut map: BTreeMap<&'static str, StatementFn> = BTreeMap::new();
        map.insert("ask", ask::ask as StatementFn);
        map.insert("copydirectory", paths::copy_directory);
        map.insert("copyfile", files::copy_file);
        map.insert("deletedirectory", paths::delete_directory);
        map.insert("deletefile", files::delete_file);
        map.insert("download", download::download);
        map.insert("execute", execute::execute);
        map.insert("exit", exit::exit);
        map.insert("makedirectory", paths::make_directory);
        map.insert("makefile", files::make_file);
        map.insert("minver", minver::minver);
        map.insert("movedirectory", paths::move_directory);
        map.insert("movefile", files::move_file);
        map.insert("pause", pause::pause);
        map.insert("run", run_script::run);
        map.insert("set", set::set);
        map.insert("write", write::write);
        map.insert("writeln", write::writeln);
        map.insert("zipdirectory", compress::zip_directory);
        map.insert("zipfile", compress::zip_file);
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<StatementFn> {
        self.map.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Comma-joined, lexicographically sorted statement names for the
    /// unknown-statement diagnostic.
    pub fn listing(&self) -> String {
        self.map
            .keys()
            .map(|name| colour::cyan(name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Shared checks. Each handler validates its own arity with its own usage
// text; the dispatcher stays generic.
// ---------------------------------------------------------------------------

/// `tokens.len() - 1 == expected` - the sentinel always adds one.
pub(crate) fn check_arity(
    tokens: &[Token],
    expected: usize,
    usage: String,
) -> Result<(), Diagnostic> {
    if tokens.len() - 1 == expected {
        return Ok(());
    }
    Err(Diagnostic::positioned(
        usage,
        tokens[0].line_number,
        None,
        Some(tokens[0].source_line.clone()),
    ))
}

/// The action separator between source and destination arguments must be
/// the literal keyword `to`.
pub(crate) fn check_action(token: &Token) -> Result<(), Diagnostic> {
    if token.value == SYMBOL_ACTION {
        return Ok(());
    }
    Err(Diagnostic::positioned(
        format!(
            "An action was made using an invalid action statement ({}), \
             please ensure that you use {}.",
            colour::magenta(&token.value),
            colour::magenta(SYMBOL_ACTION),
        ),
        token.line_number,
        Some(token.column),
        Some(token.source_line.clone()),
    ))
}

/// The `set` statement's assignment operator must be `=`.
pub(crate) fn check_assignment(token: &Token) -> Result<(), Diagnostic> {
    if token.value == SYMBOL_ASSIGNMENT {
        return Ok(());
    }
    Err(Diagnostic::positioned(
        format!(
            "An assignment was made using an invalid operator ({}), please \
             ensure that you use {}.",
            colour::magenta(&token.value),
            colour::magenta(SYMBOL_ASSIGNMENT),
        ),
        token.line_number,
        Some(token.column),
        Some(token.source_line.clone()),
    ))
}

/// Naming rules for assignment targets: no reserved prefix, no collision
/// with a statement keyword. Enforced at assignment time, not at lookup.
pub(crate) fn check_variable_name(
    name: &str,
    token: &Token,
    engine: &Engine,
) -> Result<(), Diagnostic> {
    if let Err(message) = engine.vars.check_reserved_prefix(name) {
        return Err(Diagnostic::positioned(
            message,
            token.line_number,
            Some(token.column),
            Some(token.source_line.clone()),
        ));
    }
    if engine.registry().contains(name) {
        return Err(Diagnostic::positioned(
            format!(
                "The variable - {} - is not a valid variable name as it \
                 conflicts with a statement name.",
                colour::yellow(name),
            ),
            token.line_number,
            Some(token.column),
            Some(token.source_line.clone()),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// String fixing. The tokenizer hands statement handlers raw token text;
// these helpers strip one pair of surrounding quotes and expand the
// recognized escapes.
// ---------------------------------------------------------------------------

/// Strip surrounding quotes, then expand `\"`, `\n`, and `\r`.
pub fn fix_string(input: &str) -> String {
    fix_escapes(fix_quotations(input))
}

/// Remove exactly one leading and one trailing quotation mark, and only
/// when both are present. A bare value (an integer, say) passes through.
fn fix_quotations(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        &input[1..input.len() - 1]
    } else {
        input
    }
}

fn fix_escapes(input: &str) -> String {
    input
        .replace("\\\"", "\"")
        .replace("\\n", "\n")
        .replace("\\r", "\r")
}

/// The common preparation pipeline for string arguments: fix, then
/// substitute variables.
pub(crate) fn prepared_value(token: &Token, engine: &Engine) -> String {
    engine.vars.substitute(&fix_string(&token.value))
}

/// Positioned diagnostic helper for I/O failures inside handlers.
pub(crate) fn io_error(message: String, token: &Token) -> Diagnostic {
    Diagnostic::positioned(
        message,
        token.line_number,
        Some(token.column),
        Some(token.source_line.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineOptions;

    #[test]
    fn registry_contains_all_statements() {
        let registry = Registry::standard();
        for name in [
            "ask",
            "copydirectory",
            "copyfile",
            "deletedirectory",
            "deletefile",
            "download",
            "execute",
            "exit",
            "makedirectory",
            "makefile",
            "minver",
            "movedirectory",
            "movefile",
            "pause",
            "run",
            "set",
            "write",
            "writeln",
            "zipdirectory",
            "zipfile",
        ] {
            assert!(registry.contains(name), "missing statement {name}");
        }
        assert!(!registry.contains("frobnicate"));
    }

    #[test]
    fn listing_is_sorted() {
        let listing = Registry::standard().listing();
        let ask = listing.find("ask").unwrap();
        let zip = listing.find("zipfile").unwrap();
        assert!(ask < zip);
    }

    #[test]
    fn fix_string_strips_one_quote_pair() {
        assert_eq!(fix_string("\"Hello\""), "Hello");
        assert_eq!(fix_string("\"Hello World\\\"\""), "Hello World\"");
        assert_eq!(fix_string("42"), "42");
        assert_eq!(fix_string("\""), "\"");
    }

    #[test]
    fn fix_string_expands_escapes() {
        assert_eq!(fix_string("\"a\\nb\\rc\""), "a\nb\rc");
    }

    #[test]
    fn variable_name_checks() {
        let engine = Engine::new(EngineOptions::default());
        let token = crate::tokenizer::tokenize("set b_x = \"1\"", 1, Some(1)).unwrap()[2].clone();
        assert!(check_variable_name("b_x", &token, &engine).is_err());
        assert!(check_variable_name("writeln", &token, &engine).is_err());
        assert!(check_variable_name("name", &token, &engine).is_ok());
    }
}
