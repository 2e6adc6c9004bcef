//! The `run` statement: `run "<script>"`.
//!
//! The nested script goes through the full pipeline (comment stripping,
//! `minver` validation, dispatch) against the same engine, so it shares
//! the caller's variable store. A depth counter stops scripts that run
//! themselves, directly or through a cycle.

use std::path::Path;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Flow, Outcome, MAX_RUN_DEPTH};
use crate::tokenizer::Token;

use super::{check_arity, prepared_value};

pub fn run(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        2,
        format!(
            "The {} statement needs to follow the form {} {}. An example \
             of a working call might be {} {}",
            colour::cyan("run"),
            colour::cyan("run"),
            colour::green("\"[script]\""),
            colour::cyan("run"),
            colour::green("\"other_script.bsc\""),
        ),
    )?;

    let script_name = prepared_value(&tokens[2], engine);

    if !Path::new(&script_name).exists() {
        return Err(Diagnostic::positioned(
            format!(
                "The script - {} - does not exist and/or can't be accessed. \
                 Double check to verify that the script exists.",
                colour::yellow(&script_name),
            ),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        ));
    }

    if engine.run_depth() >= MAX_RUN_DEPTH {
        return Err(Diagnostic::positioned(
            format!(
                "Running {} would nest scripts more than {} levels deep. \
                 Check that your scripts don't end up running themselves.",
                colour::yellow(&script_name),
                MAX_RUN_DEPTH,
            ),
            tokens[0].line_number,
            Some(tokens[2].column),
            Some(tokens[0].source_line.clone()),
        ));
    }

    if engine.options.verbose {
        println!(
            ":: {} {}...",
            colour::blue("Running"),
            colour::green(&script_name),
        );
    }

    engine.enter_run();
    let result = engine.run_file(Path::new(&script_name));
    engine.leave_run();

    match result? {
        Flow::Exit => Ok(Outcome::exit()),
        Flow::Continue => Ok(Outcome::value(script_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineOptions;
    use crate::tokenizer::tokenize;
    use std::fs;
    use std::io::Write as _;

    fn dispatch(line: &str, engine: &mut Engine) -> Result<Outcome, Diagnostic> {
        let tokens = tokenize(line, 1, Some(1)).unwrap();
        engine.dispatch(&tokens)
    }

    #[test]
    fn missing_script_is_reported() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("run \"no_such_script.bsc\"", &mut engine).unwrap_err();
        assert!(err.message.contains("does not exist"));
    }

    #[test]
    fn nested_script_shares_the_variable_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inner.bsc");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "set inner = \"from the inside\"").unwrap();

        let mut engine = Engine::new(EngineOptions::default());
        let line = format!("run \"{}\"", path.display());
        dispatch(&line, &mut engine).unwrap();
        assert_eq!(engine.vars.get("inner"), Some("from the inside"));
    }

    #[test]
    fn self_running_script_hits_the_depth_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.bsc");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "run \"{}\"", path.display()).unwrap();

        let mut engine = Engine::new(EngineOptions::default());
        let line = format!("run \"{}\"", path.display());
        let err = dispatch(&line, &mut engine).unwrap_err();
        assert!(err.message.contains("levels deep"));
        assert_eq!(engine.run_depth(), 0);
    }

    #[test]
    fn exit_in_a_nested_script_exits_the_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quitter.bsc");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "exit").unwrap();

        let mut engine = Engine::new(EngineOptions::default());
        let line = format!("run \"{}\"", path.display());
        let outcome = dispatch(&line, &mut engine).unwrap();
        assert_eq!(outcome.flow, Flow::Exit);
    }
}
