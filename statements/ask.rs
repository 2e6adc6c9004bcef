//! The `ask` statement: `ask "<prompt>" to <variable>`.

use std::io::{self, BufRead, Write};

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::eval;
use crate::tokenizer::Token;

use super::{check_action, check_arity, check_variable_name, fix_string, prepared_value};

pub fn ask(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        format!(
            "The {} statement needs to follow the form {} {} to {}. An \
             example of a working prompt might be {} {} to name",
            colour::cyan("ask"),
            colour::cyan("ask"),
            colour::green("\"[question/prompt]\""),
            colour::yellow("[variable name]"),
            colour::cyan("ask"),
            colour::green("\"What is your name?\""),
        ),
    )?;

    let prompt = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;

    // The target may arrive quoted; fix it like any other string argument.
    let name = fix_string(&tokens[4].value);
    check_variable_name(&name, &tokens[4], engine)?;

    if engine.options.verbose {
        println!(
            ":: {} user \"{}\" and saving to variable {}...",
            colour::blue("Asking"),
            colour::green(&prompt),
            colour::yellow(&name),
        );
    }

    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).map_err(|err| {
        Diagnostic::positioned(
            format!("There was an error getting the user input. {err}"),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        )
    })?;
    let input = input.trim_end_matches(['\n', '\r']);

    let value = eval::fold(input);
    engine.vars.assign(&name, &value);
    Ok(Outcome::value(value))
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
    fn wrong_arity_is_a_usage_error() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("ask \"Name?\"", &mut engine).unwrap_err();
        assert!(err.message.contains("question/prompt"));
    }

    #[test]
    fn bad_action_separator_is_rejected() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("ask \"Name?\" into name", &mut engine).unwrap_err();
        assert!(err.message.contains("invalid action statement"));
    }

    #[test]
    fn reserved_target_is_rejected_before_prompting() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("ask \"Name?\" to b_user", &mut engine).unwrap_err();
        assert!(err.message.contains("b_"));
    }
}
