//=====================================================
// File: lib.rs
//=====================================================
// Author: BistroScript Contributors
// License: MIT (see LICENSE)
// Goal: BistroScript library main interface
// Objective: Export the engine, tokenizer, preprocessor, variable store, and
//            diagnostics that make up the BistroScript interpreter
//=====================================================

pub mod colour;
pub mod diagnostics;
pub mod engine;
pub mod eval;
pub mod preprocessor;
pub mod statements;
pub mod tokenizer;
pub mod variables;

/// Language name used in messages and the starter template.
pub const LANG_NAME: &str = "BistroScript";

/// Interpreter version. Plain integer versioning; `minver` compares
/// against this.
pub const LANG_VERSION: u32 = 1;

/// Comment lines start with this symbol.
pub const SYMBOL_COMMENT: char = '-';

/// Separator keyword between source and destination arguments.
pub const SYMBOL_ACTION: &str = "to";

/// The only valid assignment operator for `set`.
pub const SYMBOL_ASSIGNMENT: &str = "=";

/// Marker that introduces a variable reference inside string arguments.
pub const SYMBOL_SUBSTITUTION: char = '#';

/// Prefix reserved for runtime-computed variables.
pub const RESERVED_PREFIX: &str = "b_";

/// Scripts may start with `#!<interpreter-path>` on *nix systems.
pub const SHEBANG_MARKER: &str = "#!";

pub use diagnostics::Diagnostic;
pub use engine::{Engine, EngineOptions, Flow, Outcome};
pub use tokenizer::{tokenize, Token, TokenKind};

//=====================================================
// End of file
//=====================================================
