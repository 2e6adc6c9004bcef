//! The `write` and `writeln` statements.

use std::io::{self, Write as _};

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::{check_arity, prepared_value};

pub fn write(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    emit(tokens, engine, false)
}

pub fn writeln(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    emit(tokens, engine, true)
}

fn emit(tokens: &[Token], engine: &mut Engine, newline: bool) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        2,
        format!(
            "The {} statement needs to follow the form {} {}. A common \
             error here is trying to concatenate multiple values into one \
             statement call. An example of a working version might be {} {}",
            colour::cyan("write/writeln"),
            colour::cyan("write/writeln"),
            colour::yellow("[content to be written]"),
            colour::cyan("write/writeln"),
            colour::green("\"Hello World\""),
        ),
    )?;

    let output = prepared_value(&tokens[2], engine);
    if newline {
        println!("{output}");
    } else {
        print!("{output}");
        let _ = io::stdout().flush();
    }
    Ok(Outcome::value(output))
}
