//! Directory statements: `copydirectory`, `movedirectory`,
//! `deletedirectory`, and `makedirectory`.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::{check_action, check_arity, io_error, prepared_value};

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
        "The {} statement needs to follow the form {} {}. A common error \
         here is trying to concatenate multiple values into one statement \
         call. An example of a working version might be {} {}.",
        colour::cyan(name),
        colour::cyan(name),
        colour::yellow("\"[path]\""),
        colour::cyan(name),
        colour::green(example),
    )
}

/// The copy lands inside the destination under the source's own directory
/// name, so `copydirectory "a/b" to "c"` produces `c/b`.
fn nested_destination(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    }
}

fn copy_tree(
    source: &Path,
    destination: &Path,
    engine: &Engine,
    tokens: &[Token],
) -> Result<(), Diagnostic> {
    let target_root = nested_destination(source, destination);

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|err| {
            io_error(
                format!(
                    "There was an error traversing {}. Perhaps you don't \
                     have read permissions? {err}",
                    colour::yellow(&source.display().to_string()),
                ),
                &tokens[2],
            )
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let target = target_root.join(relative);

        if entry.file_type().is_dir() {
            if engine.options.verbose {
                println!(
                    ":: Making {}...",
                    colour::green(&target.display().to_string()),
                );
            }
            fs::create_dir_all(&target).map_err(|err| {
                io_error(
                    format!(
                        "Couldn't create the directory {}. Check that you \
                         have write permissions to write to {}. {err}",
                        colour::yellow(&target.display().to_string()),
                        colour::yellow(&destination.display().to_string()),
                    ),
                    &tokens[4],
                )
            })?;
        } else {
            if engine.options.verbose {
                print!(
                    "    :: Copying {}...",
                    colour::green(&entry.file_name().to_string_lossy()),
                );
            }
            let bytes = fs::copy(entry.path(), &target).map_err(|err| {
                io_error(
                    format!(
                        "Couldn't create the file in {}. Check that you \
                         have write permissions to write to {} and/or that \
                         there is enough space available for you to copy \
                         the file(s) over. {err}",
                        colour::yellow(&target.display().to_string()),
                        colour::yellow(&destination.display().to_string()),
                    ),
                    &tokens[4],
                )
            })?;
            if engine.options.verbose {
                println!("done. {}", colour::magenta(&format!("[{bytes} bytes]")));
            }
        }
    }
    Ok(())
}

pub fn copy_directory(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        pair_usage("copydirectory", "\"test_dir\"", "\"new_dir\""),
    )?;

    let source = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let destination = prepared_value(&tokens[4], engine);

    let source_path = Path::new(&source);
    if !source_path.is_dir() {
        return Err(io_error(
            format!(
                "The directory - {} - does not exist and/or can't be \
                 accessed. Double check to verify that the directory \
                 exists.",
                colour::yellow(&source),
            ),
            &tokens[2],
        ));
    }

    copy_tree(source_path, Path::new(&destination), engine, tokens)?;
    Ok(Outcome::value(destination))
}

pub fn move_directory(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        pair_usage("movedirectory", "\"test_dir\"", "\"actual_dir\""),
    )?;

    let source = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let destination = prepared_value(&tokens[4], engine);

    if engine.options.verbose {
        print!(
            ":: {} {} to {}...",
            colour::blue("Moving"),
            colour::green(&source),
            colour::green(&destination),
        );
    }

    // A rename fails across partitions; fall back to copy-then-delete.
    if fs::rename(&source, &destination).is_err() {
        let source_path = Path::new(&source);
        if !source_path.is_dir() {
            return Err(io_error(
                format!(
                    "The directory - {} - does not exist and/or can't be \
                     accessed. Double check to verify that the directory \
                     exists.",
                    colour::yellow(&source),
                ),
                &tokens[2],
            ));
        }
        copy_tree(source_path, Path::new(&destination), engine, tokens)?;
        fs::remove_dir_all(&source).map_err(|_| {
            io_error(
                format!(
                    "There was an error removing the source directory: {}. \
                     It will be worth trying to remove it manually.",
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

pub fn delete_directory(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(tokens, 2, single_usage("deletedirectory", "\"test_dir\""))?;

    let path = prepared_value(&tokens[2], engine);
    if !Path::new(&path).exists() {
        return Err(io_error(
            format!(
                "There was an error removing {}. The path does not exist.",
                colour::magenta(&path),
            ),
            &tokens[2],
        ));
    }

    if engine.options.verbose {
        print!(
            ":: {} {}...",
            colour::blue("Deleting"),
            colour::green(&path),
        );
    }
    fs::remove_dir_all(&path).map_err(|err| {
        io_error(
            format!(
                "There was an error removing {}. {err}",
                colour::magenta(&path),
            ),
            &tokens[2],
        )
    })?;
    if engine.options.verbose {
        println!("done!");
    }
    Ok(Outcome::value(path))
}

pub fn make_directory(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(tokens, 2, single_usage("makedirectory", "\"test_dir\""))?;

    let path = prepared_value(&tokens[2], engine);
    if engine.options.verbose {
        print!(
            ":: {} {}...",
            colour::blue("Making"),
            colour::green(&path),
        );
    }
    fs::create_dir_all(&path).map_err(|_| {
        io_error(
            format!(
                "Error creating the directory {}. Check to make sure that \
                 you have the right permissions to the parent directory.",
                colour::yellow(&path),
            ),
            &tokens[2],
        )
    })?;
    if engine.options.verbose {
        println!("done!");
    }
    Ok(Outcome::value(path))
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
    fn makes_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        let mut engine = Engine::new(EngineOptions::default());
        let line = format!("makedirectory \"{}\"", target.display());
        dispatch(&line, &mut engine).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn copies_a_tree_under_the_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src_dir");
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::write(source.join("top.txt"), "top").unwrap();
        fs::write(source.join("nested").join("deep.txt"), "deep").unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut engine = Engine::new(EngineOptions::default());
        let line = format!(
            "copydirectory \"{}\" to \"{}\"",
            source.display(),
            dest.display(),
        );
        dispatch(&line, &mut engine).unwrap();

        let copied = dest.join("src_dir");
        assert_eq!(fs::read_to_string(copied.join("top.txt")).unwrap(), "top");
        assert_eq!(
            fs::read_to_string(copied.join("nested").join("deep.txt")).unwrap(),
            "deep",
        );
        assert!(source.exists());
    }

    #[test]
    fn moves_a_tree() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("old_dir");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("f.txt"), "f").unwrap();
        let dest = dir.path().join("new_dir");

        let mut engine = Engine::new(EngineOptions::default());
        let line = format!(
            "movedirectory \"{}\" to \"{}\"",
            source.display(),
            dest.display(),
        );
        dispatch(&line, &mut engine).unwrap();
        assert!(!source.exists());
        assert!(dest.join("f.txt").exists());
    }

    #[test]
    fn deletes_a_tree() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doomed");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("f.txt"), "f").unwrap();

        let mut engine = Engine::new(EngineOptions::default());
        let line = format!("deletedirectory \"{}\"", target.display());
        dispatch(&line, &mut engine).unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn deleting_a_missing_tree_is_reported() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch("deletedirectory \"no_such_dir\"", &mut engine).unwrap_err();
        assert!(err.message.contains("does not exist"));
    }

    #[test]
    fn copying_a_missing_source_is_reported() {
        let mut engine = Engine::new(EngineOptions::default());
        let err =
            dispatch("copydirectory \"no_such_dir\" to \"dest\"", &mut engine).unwrap_err();
        assert!(err.message.contains("does not exist"));
    }
}
