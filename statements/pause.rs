//! The `pause` statement: `pause <seconds>`.

use std::thread;
use std::time::Duration;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::check_arity;

pub fn pause(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        2,
        format!(
            "The {} statement needs to follow the form {} {}. A common \
             issue here is excluding a pause length or passing one as a \
             string (eg. {}). An example of a working pause might be {}{} \
             (notice that there is an integer that is not in quotation \
             marks).",
            colour::cyan("pause"),
            colour::cyan("pause"),
            colour::yellow("[seconds]"),
            colour::green("\"3\""),
            colour::cyan("pause"),
            colour::yellow(" 3"),
        ),
    )?;

    let raw = tokens[2].value.as_str();
    let seconds: u64 = raw.parse().map_err(|_| {
        Diagnostic::positioned(
            format!(
                "The pause length {} is not a valid length. You need to use \
                 a positive integer number of seconds.",
                colour::yellow(raw),
            ),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        )
    })?;

    if engine.options.verbose {
        println!(":: Pausing for {raw} seconds...");
    }
    thread::sleep(Duration::from_secs(seconds));
    Ok(Outcome::value(raw))
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
    fn zero_second_pause_is_valid() {
        let mut engine = Engine::new(EngineOptions::default());
        let outcome = dispatch("pause 0", &mut engine).unwrap();
        assert_eq!(outcome.value.as_deref(), Some("0"));
    }

    #[test]
    fn negative_and_quoted_lengths_are_rejected() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("pause -1", &mut engine).unwrap_err();
        assert!(err.message.contains("not a valid length"));
        let err = dispatch("pause \"3\"", &mut engine).unwrap_err();
        assert!(err.message.contains("not a valid length"));
    }

    #[test]
    fn missing_length_is_a_usage_error() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("pause", &mut engine).unwrap_err();
        assert!(err.message.contains("[seconds]"));
    }
}
