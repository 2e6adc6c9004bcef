//! The `download` statement: `download "<url>" to "<path>"`.
//!
//! The body streams into a temporary file first and is moved into place
//! only once the transfer completes, so an interrupted download never
//! leaves a half-written file at the destination. Progress is reported on
//! a single rewritten line.

use std::fs;
use std::io::{self, Read, Write as _};
use std::path::{Path, MAIN_SEPARATOR};

use crate::colour;
use crate::diagnostics::Diagnostic;
use crate::engine::{Engine, Outcome};
use crate::tokenizer::Token;

use super::{check_action, check_arity, io_error, prepared_value};

const CHUNK_SIZE: usize = 32 * 1024;

pub fn download(tokens: &[Token], engine: &mut Engine) -> Result<Outcome, Diagnostic> {
    check_arity(
        tokens,
        4,
        format!(
            "The {} statement needs to follow the form {} {} to {}. A \
             common issue is the use of an inappropriate action symbol \
             ({}). An example of a working version might be {} {} to {}",
            colour::cyan("download"),
            colour::cyan("download"),
            colour::green("\"[url]\""),
            colour::green("\"[path]\""),
            colour::magenta(crate::SYMBOL_ACTION),
            colour::cyan("download"),
            colour::green("\"https://example.com/file.txt\""),
            colour::green("\"file.txt\""),
        ),
    )?;

    let url = prepared_value(&tokens[2], engine);
    check_action(&tokens[3])?;
    let mut save_name = prepared_value(&tokens[4], engine);

    // Take the remote file name from the URL path for directory targets.
    let remote_file_name = url
        .split('/')
        .next_back()
        .filter(|name| !name.is_empty())
        .unwrap_or("download")
        .split(['?', '#'])
        .next()
        .unwrap_or("download")
        .to_string();

    let temp = tempfile_path(&remote_file_name);
    if engine.options.verbose {
        println!(
            ":: Creating a temp file - {} - to store the download before \
             it's moved to its final home: {save_name}.",
            temp.display(),
        );
    }

    let response = ureq::get(&url)
        .set(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
        )
        .call()
        .map_err(|_| {
            io_error(
                format!(
                    "There was an error getting the file - {}. Make sure \
                     that the URL is valid.",
                    colour::cyan(&url),
                ),
                &tokens[2],
            )
        })?;

    let total_bytes: Option<u64> = response
        .header("Content-Length")
        .and_then(|length| length.parse().ok());

    println!("Downloading {}", colour::green(&remote_file_name));

    let mut reader = response.into_reader();
    let mut file = fs::File::create(&temp).map_err(|err| {
        io_error(
            format!(
                "Issue with creating a temporary file to store the \
                 download. The temp file that I tried to make was {}. \
                 Check to make sure that {} is writeable. {err}",
                temp.display(),
                colour::cyan(&std::env::temp_dir().display().to_string()),
            ),
            &tokens[4],
        )
    })?;

    let mut downloaded: u64 = 0;
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut chunk).map_err(|err| {
            io_error(
                format!("There is an error saving the downloaded chunk: {err}"),
                &tokens[2],
            )
        })?;
        if read == 0 {
            break;
        }
        file.write_all(&chunk[..read]).map_err(|err| {
            io_error(
                format!("There is an error saving the downloaded chunk: {err}"),
                &tokens[4],
            )
        })?;
        downloaded += read as u64;
        print_progress(downloaded, total_bytes);
    }
    println!();
    drop(file);

    // Downloading into a directory keeps the remote file name.
    if Path::new(&save_name).is_dir() {
        if !save_name.ends_with(MAIN_SEPARATOR) {
            save_name.push(MAIN_SEPARATOR);
        }
        save_name.push_str(&remote_file_name);
    }

    // Renames fail across filesystems, so fall back to copy-then-delete.
    if fs::rename(&temp, &save_name).is_err() {
        fs::copy(&temp, &save_name).map_err(|_| {
            io_error(
                format!(
                    "The destination - {} - is invalid. Are you sure that \
                     the destination exists?",
                    colour::yellow(&save_name),
                ),
                &tokens[4],
            )
        })?;
        let _ = fs::remove_file(&temp);
    }

    println!("File downloaded to {}", colour::green(&save_name));
    Ok(Outcome::value(save_name))
}

fn tempfile_path(remote_file_name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "bistro_dl_{}_{remote_file_name}",
        std::process::id(),
    ))
}

/// One rewritten progress line: percentage when the server told us the
/// size, a bare KB count when it didn't.
fn print_progress(downloaded: u64, total: Option<u64>) {
    let mut out = io::stdout();
    match total {
        Some(total) if total > 0 => {
            let percentage = downloaded as f64 / total as f64 * 100.0;
            let _ = write!(
                out,
                "\rDownloaded {} ({:.1} KB of {:.1} KB)",
                colour::magenta(&format!("{percentage:.2}%")),
                downloaded as f64 / 1024.0,
                total as f64 / 1024.0,
            );
        }
        _ => {
            let _ = write!(out, "\rDownloaded {:.1} KB", downloaded as f64 / 1024.0);
        }
    }
    let _ = out.flush();
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
        let err = dispatch("download \"https://example.com/a\"", &mut engine).unwrap_err();
        assert!(err.message.contains("[url]"));
    }

    #[test]
    fn bad_action_separator_is_rejected() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch(
            "download \"https://example.com/a\" into \"a.txt\"",
            &mut engine,
        )
        .unwrap_err();
        assert!(err.message.contains("invalid action statement"));
    }

    #[test]
    fn invalid_url_is_reported() {
        let mut engine = Engine::new(EngineOptions::default());
        let err = dispatch(
            "download \"not a url at all\" to \"a.txt\"",
            &mut engine,
        )
        .unwrap_err();
        assert!(err.message.contains("Make sure that the URL is valid"));
    }
}
