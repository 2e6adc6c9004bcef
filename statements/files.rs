//! File statements: `copyfile`, `movefile`, `deletefile`, and `makefile`.

use std::fs;
use std::path::{Path, MAIN_SEPARATOR};

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::{check_action, check_arity, io_error, prepared_value};

/// A destination ending in a path separator means "into this directory";
/// the source's file name gets appended so the copy keeps its name.
fn resolve_destination(source: &str, destination: &str) -> String {
    if destination.ends_with(MAIN_SEPARATOR) {
        let filename = source
            .rsplit(MAIN_SEPARATOR)
            .next()
            .unwrap_or(source);
        format!("{destination}{filename}")
    } else {
        destination.to_string()
    }
}

fn pair_usage(name: &str, example_src: &str, example_dest: &str) -> String {
    format!(
        "The {} statement needs to follow the form {} {} to {}. A common \
         issue is the use of an inappropriate action symbol ({}). An \
         example of a working version might be {} {} to {}",
        colour::cyan(name),
        colour::cyan(name),
        colour::green("\"[path]\""),
        colour::green("\"[path]\""),
        colour::magenta(crate::SYMBOL_ACTION),
        colour::cyan(name),
        colour::green(example_src),
        colour::green(example_dest),
    )
}

fn single_usage(name: &str, example: &str) -> String {
    format!(
        "The {} statement needs to follow the form {} {}. An example of a \
         working version might be {} {}.",
        colour::cyan(name),
        colour::cyan(name),
        colour::green("\"[path]\""),
        colour::cyan(name),
        colour::green(example),
    )
}

pub fn copy_file(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        pair_usage("copyfile", "\"test.txt\"", "\"test_new.txt\""),
    )?;

    let source = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let destination = resolve_destination(&source, &prepared_value(&tokens[4], engine));

    if engine.options.verbose {
        print!(
            ":: {} {} to {}...",
            colour::blue("Copying"),
            colour::green(&source),
            colour::green(&destination),
        );
    }

    let bytes = do_copy(&source, &destination, tokens)?;

    if engine.options.verbose {
        println!("done! {}", colour::magenta(&format!("[{bytes} bytes written]")));
    }
    Ok(Outcome::value(destination))
}

fn do_copy(source: &str, destination: &str, tokens: &[Token]) -> Result<u64, Diagnostic> {
    if !Path::new(source).is_file() {
        return Err(io_error(
            format!(
                "Can't open {}! Are you sure that the file exists?",
                colour::yellow(source),
            ),
            &tokens[2],
        ));
    }
    fs::copy(source, destination).map_err(|_| {
        io_error(
            format!(
                "The destination - {} - is invalid. Are you sure that the \
                 destination exists? If you're trying to copy to a \
                 directory, make sure to put in a trailing {}",
                colour::yellow(destination),
                colour::yellow(&MAIN_SEPARATOR.to_string()),
            ),
            &tokens[4],
        )
    })
}

pub fn move_file(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        pair_usage("movefile", "\"test.txt\"", "\"test_new.txt\""),
    )?;

    let source = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let destination = resolve_destination(&source, &prepared_value(&tokens[4], engine));

    if engine.options.verbose {
        print!(
            ":: {} {} to {}...",
            colour::blue("Moving"),
            colour::green(&source),
            colour::green(&destination),
        );
    }

    // A rename fails across filesystems; fall back to copy-then-delete.
    if fs::rename(&source, &destination).is_err() {
        do_copy(&source, &destination, tokens)?;
        fs::remove_file(&source).map_err(|_| {
            io_error(
                format!(
                    "There was an error removing the source file: {}. It \
                     will be worth trying to remove it manually.",
                    colour::yellow(&source),
                ),
                &tokens[2],
            )
        })?;
    }

    if engine.options.verbose {
        println!("done!");
    }
    Ok(Outcome::value(destination))
}

pub fn delete_file(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(tokens, 2, single_usage("deletefile", "\"test.txt\""))?;

    let source = prepared_value(&tokens[2], engine);
    if !Path::new(&source).exists() {
        return Err(io_error(
            format!("{} does not exist.", colour::magenta(&source)),
            &tokens[2],
        ));
    }

    if engine.options.verbose {
        print!(":: Deleting {}...", colour::magenta(&source));
    }
    fs::remove_file(&source).map_err(|_| {
        io_error(
            format!(
                "There was an error deleting the file: {}. Check to make \
                 sure that you have the right permissions to delete the \
                 file.",
                colour::magenta(&source),
            ),
            &tokens[2],
        )
    })?;
    if engine.options.verbose {
        println!("done!");
    }
    Ok(Outcome::value(source))
}

pub fn make_file(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(tokens, 2, single_usage("makefile", "\"test.txt\""))?;

    let file_name = prepared_value(&tokens[2], engine);
    if Path::new(&file_name).exists() {
        return Err(io_error(
            format!("{} exists already.", colour::magenta(&file_name)),
            &tokens[2],
        ));
    }

    if engine.options.verbose {
        print!(":: Making {}...", colour::magenta(&file_name));
    }
    fs::File::create(&file_name).map_err(|err| {
        io_error(
            format!(
                "{} could not be created: {err}",
                colour::magenta(&file_name),
            ),
            &tokens[2],
        )
    })?;
    if engine.options.verbose {
        println!("done!");
    }
    Ok(Outcome::value(file_name))
}
