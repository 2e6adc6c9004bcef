//! The `set` statement: `set <name> = "<value>"`.

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::eval;
use crate::tokenizer::Token;
use crate::LANG_NAME;

use super::{check_arity, check_assignment, check_variable_name, fix_string};

pub fn set(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        format!(
            "The {} statement needs to follow the form {} {} = {}. An \
             example of a working assignment might be {} name = {}",
            colour::cyan("set"),
            colour::cyan("set"),
            colour::yellow("[variable name]"),
            colour::green("\"[value]\""),
            colour::cyan("set"),
            colour::green(&format!("\"{LANG_NAME}\"")),
        ),
    )?;

    let name = tokens[2].value.as_str();
    check_variable_name(name, &tokens[2], engine)?;
    check_assignment(&tokens[3])?;

    // Fix, substitute, then fold: "#b_cpu * 2" becomes an actual number.
    let value = fix_string(&tokens[4].value);
    let value = engine.vars.substitute(&value);
    let value = eval::fold(&value);

    if engine.options.verbose {
        print!(
            ":: {} {} to {}...",
            colour::blue("Setting"),
            colour::yellow(name),
            colour::green(&value),
        );
    }
    engine.vars.assign(name, &value);
    if engine.options.verbose {
        println!("done!");
    }

    Ok(Outcome::value(value))
}
