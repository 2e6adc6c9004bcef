//! Compression statements: `zipfile` and `zipdirectory`.
//!
//! Archives are gzip streams. `zipfile` compresses one file into one
//! `.gz`; `zipdirectory` walks the source tree and writes a mirrored
//! tree of per-file `.gz` entries under the destination directory.

use std::fs;
use std::io;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use walkdir::WalkDir;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::{check_action, check_arity, io_error, prepared_value};

fn usage(name: &str, example_src: &str, example_dest: &str) -> String {
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

fn compress_one(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut input = fs::File::open(source)?;
    let output = fs::File::create(destination)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    let bytes = io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    Ok(bytes)
}

pub fn zip_file(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        usage("zipfile", "\"test.txt\"", "\"test.txt.gz\""),
    )?;

    let source = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let destination = prepared_value(&tokens[4], engine);

    if !Path::new(&source).is_file() {
        return Err(io_error(
            format!(
                "Couldn't open {}! Is it possible that this file doesn't \
                 exist?",
                colour::yellow(&source),
            ),
            &tokens[2],
        ));
    }

    if engine.options.verbose {
        print!(
            ":: {} {} to {}...",
            colour::blue("Zipping"),
            colour::green(&source),
            colour::green(&destination),
        );
    }

    let bytes = compress_one(Path::new(&source), Path::new(&destination)).map_err(|_| {
        io_error(
            format!(
                "The archive name you provided - {} - could not be \
                 created. Is it possible that you can't write to that \
                 path?",
                colour::yellow(&destination),
            ),
            &tokens[4],
        )
    })?;

    if engine.options.verbose {
        println!("done! {}", colour::magenta(&format!("[{bytes} bytes read]")));
    }
    Ok(Outcome::value(destination))
}

pub fn zip_directory(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        usage("zipdirectory", "\"test_dir\"", "\"test_dir_zipped\""),
    )?;

    let source = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let destination = prepared_value(&tokens[4], engine);

    let source_path = Path::new(&source);
    if !source_path.is_dir() {
        return Err(io_error(
            format!(
                "There was an error traversing {}. Is it possible that you \
                 can't read from that path?",
                colour::yellow(&source),
            ),
            &tokens[2],
        ));
    }

    if engine.options.verbose {
        println!(
            ":: {} {} to {}...",
            colour::blue("Zipping"),
            colour::green(&source),
            colour::green(&destination),
        );
    }

    let dest_root = Path::new(&destination);
    for entry in WalkDir::new(source_path) {
        let entry = entry.map_err(|err| {
            io_error(
                format!(
                    "There was an error traversing {}. Is it possible \
                     that you can't read from that path? {err}",
                    colour::yellow(&source),
                ),
                &tokens[2],
            )
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_path)
            .unwrap_or_else(|_| entry.path());
        let mut target = dest_root.join(relative).into_os_string();
        target.push(".gz");
        let target = Path::new(&target);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|_| {
                io_error(
                    format!(
                        "The archive name you provided - {} - could not \
                         be created. Is it possible that you can't write \
                         to that path?",
                        colour::yellow(&destination),
                    ),
                    &tokens[4],
                )
            })?;
        }

        if engine.options.verbose {
            print!(
                ":: {} {}...",
                colour::blue("Adding"),
                colour::green(&entry.path().display().to_string()),
            );
        }
        let bytes = compress_one(entry.path(), target).map_err(|_| {
            io_error(
                format!(
                    "There was an error creating the file: {}. Is it \
                     possible that you can't write to that path?",
                    colour::yellow(&target.display().to_string()),
                ),
                &tokens[4],
            )
        })?;
        if engine.options.verbose {
            println!("done {}", colour::magenta(&format!("[{bytes} bytes read]")));
        }
    }

    Ok(Outcome::value(destination))
}
