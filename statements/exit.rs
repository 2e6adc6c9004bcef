//! The `exit` statement.

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::check_arity;

pub fn exit(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        1,
        format!(
            "The {} statement needs to follow the form:\n\n\t{}\n\nThere \
             are no values that you can or need to pass which is most \
             likely the cause here.",
            colour::cyan("exit"),
            colour::cyan("exit"),
        ),
    )?;

    if engine.options.verbose {
        println!(":: Exiting...");
    }
    Ok(Outcome::exit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineOptions, Flow};
    use crate::tokenizer::tokenize;

    #[test]
    fn exit_produces_exit_flow() {
        let mut engine = Engine::new(EngineOptions::default());
        let tokens = tokenize("exit", 1, Some(1)).unwrap();
        let outcome = engine.dispatch(&tokens).unwrap();
        assert_eq!(outcome.flow, Flow::Exit);
    }

    #[test]
    fn arguments_are_a_usage_error() {
        let mut engine = Engine::new(EngineOptions::default());
        let tokens = tokenize("exit now", 1, Some(1)).unwrap();
        let err = engine.dispatch(&tokens).unwrap_err();
        assert!(err.message.contains("no values"));
    }
}
