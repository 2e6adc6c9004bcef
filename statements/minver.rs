//! The `minver` statement: `minver <version>`.
//!
//! Placement and uniqueness are validated script-wide by the preprocessor
//! before any line runs; this handler is the compatibility half of the
//! check, comparing the declared minimum against the interpreter's own
//! version at dispatch time.

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;
use crate::LANG_VERSION;

use super::check_arity;

pub fn minver(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        2,
        format!(
            "The {} statement needs to follow the form {} {}. A common \
             issue here is excluding a version number or passing one as a \
             string (eg. {}). An example of a working version check might \
             be {}{} (notice that there is an integer that is not in \
             quotation marks).",
            colour::cyan("minver"),
            colour::cyan("minver"),
            colour::yellow("[version number]"),
            colour::green("\"3\""),
            colour::cyan("minver"),
            colour::yellow(" 3"),
        ),
    )?;

    let declared = tokens[2].value.as_str();
    let min_ver: u32 = declared.parse().map_err(|_| {
        Diagnostic::positioned(
            format!(
                "The version number {} is not a valid version. You need to \
                 use a positive integer.",
                colour::yellow(declared),
            ),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        )
    })?;

    if min_ver > LANG_VERSION {
        return Err(Diagnostic::positioned(
            format!(
                "The script you're running here requires a newer version of \
                 the interpreter. You are running version {} but the script \
                 requires at least version {}. Check to see if a newer \
                 version is available.",
                colour::yellow(&LANG_VERSION.to_string()),
                colour::yellow(declared),
            ),
            tokens[0].line_number,
            None,
            Some(tokens[0].source_line.clone()),
        ));
    }

    if engine.options.verbose {
        println!(
            ":: Setting the {} required to run this script to {}",
            colour::blue("minver"),
            colour::green(declared),
        );
    }
    Ok(Outcome::value(declared))
}
