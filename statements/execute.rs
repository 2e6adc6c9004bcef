//! The `execute` statement: `execute "<command>"`, gated behind the
//! `--allow-exec` flag.

use std::process::Command;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::{check_arity, prepared_value};

pub fn execute(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        2,
        format!(
            "The {} statement needs to follow the form {} {}. A common \
             issue here is excluding a command. An example of a working \
             statement might be {} {}.",
            colour::cyan("execute"),
            colour::cyan("execute"),
            colour::green("\"[command]\""),
            colour::cyan("execute"),
            colour::green("\"ls\""),
        ),
    )?;

    let command = prepared_value(&tokens[2], engine);

    if !engine.options.allow_exec {
        return Err(Diagnostic::positioned(
            format!(
                "You are unable to execute system commands. If you would \
                 like to do so, you need to run with the {} flag.",
                colour::yellow("--allow-exec"),
            ),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        ));
    }

    if engine.options.verbose {
        println!(
            ":: {} {}...",
            colour::blue("Executing"),
            colour::yellow(&command),
        );
    }

    let mut parts = command.split_whitespace();
    let program = parts.next().unwrap_or_default();
    let output = Command::new(program).args(parts).output().map_err(|_| {
        Diagnostic::positioned(
            format!(
                "The application {} was not found. Perhaps it was a typo?",
                colour::yellow(&command),
            ),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        )
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    println!("{stdout}");
    Ok(Outcome::value(stdout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineOptions;
    use crate::tokenizer::tokenize;

    fn dispatch(line: &str, engine: &mut Engine) -> Result<Outcome, Diagnostic> {
        let tokens = tokenize(line, 1, Some(1)).unwrap();
        engine.dispatch(&tokens)
    }

    #[test]
    fn refuses_without_the_exec_gate() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("execute \"echo hi\"", &mut engine).unwrap_err();
        assert!(err.message.contains("--allow-exec"));
    }

    #[test]
    fn captures_command_output_when_allowed() {
        let mut engine = Engine::new(EngineOptions {
            allow_exec: true,
            ..EngineOptions::default()
        });
        let outcome = dispatch("execute \"echo hi\"", &mut engine).unwrap();
        assert!(outcome.value.unwrap().contains("hi"));
    }

    #[test]
    fn unknown_program_is_reported() {
        let mut engine = Engine::new(EngineOptions {
            allow_exec: true,
            ..EngineOptions::default()
        });
        let err = dispatch("execute \"definitely_not_a_program_xyz\"", &mut engine).unwrap_err();
        assert!(err.message.contains("was not found"));
    }
}
