//=====================================================
// File: main.rs
//=====================================================
// Author: BistroScript Contributors
// License: MIT (see LICENSE)
// Goal: Command line entry point for the bistro interpreter
// Objective: Parse flags, drive the engine, and report diagnostics
//=====================================================

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use bistroscript::colour;
use bistroscript::{Diagnostic, Engine, EngineOptions, LANG_NAME, LANG_VERSION};

const UPDATE_URL: &str = "https://bistroscript.dev/version_info.json";

#[derive(Parser, Debug)]
#[command(name = "bistro", about = "The BistroScript interpreter")]
struct Args {
    /// Script to run.
    script: Option<PathBuf>,

    /// Narrate each statement as it executes.
    #[arg(long)]
    verbose: bool,

    /// Allow the execute statement to run system commands.
    #[arg(long)]
    allow_exec: bool,

    /// Time the execution of the script.
    #[arg(long)]
    timer: bool,

    /// Dump tokens and a token summary instead of executing statements.
    #[arg(long)]
    dev: bool,

    /// Create a starter script at the path specified.
    #[arg(long, value_name = "PATH")]
    create: Option<PathBuf>,

    /// Show interpreter and platform details, and check for updates.
    #[arg(long)]
    version_info: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.create {
        create_starter_script(path)?;
        return Ok(());
    }

    if args.version_info {
        print_version_info();
        return Ok(());
    }

    let Some(script) = &args.script else {
        report_and_exit(&Diagnostic::general(
            "You need to pass a script name to the interpreter.",
        ));
    };

    let start = Instant::now();
    let mut engine = Engine::new(EngineOptions {
        verbose: args.verbose,
        allow_exec: args.allow_exec,
        dev: args.dev,
    });

    if args.dev {
        println!("{}", colour::yellow("Tokens"));
    }
    if let Err(diag) = engine.run_file(script) {
        report_and_exit(&diag);
    }

    if args.timer {
        let elapsed = start.elapsed();
        println!("{}", colour::cyan("\nTotal Running Times"));
        println!("\tReported value: {elapsed:?}");
        println!("\tRounded (millisecond): {}ms", elapsed.as_millis());
        println!("\tRounded (nanosecond): {}ns", elapsed.as_nanos());
    }

    if args.dev {
        print_token_summary(&engine);
    }

    Ok(())
}

/// Diagnostics go to stdout and the interpreter leaves with a success
/// code, matching the friendly-tool posture of the rest of the output.
fn report_and_exit(diag: &Diagnostic) -> ! {
    println!("{diag}");
    process::exit(0);
}

fn create_starter_script(path: &Path) -> Result<()> {
    let template = format!(
        "#!/usr/bin/bistro\nminver {LANG_VERSION}\n\n- Say hello to the \
         world\nwriteln \"Hello World!\"\n",
    );

    // A leading tilde means the user's home directory.
    let target = match path.to_str().and_then(|p| p.strip_prefix('~')) {
        Some(rest) => match dirs::home_dir() {
            Some(home) => PathBuf::from(format!("{}{rest}", home.display())),
            None => path.to_path_buf(),
        },
        None => path.to_path_buf(),
    };

    std::fs::write(&target, template).with_context(|| {
        format!(
            "There was an error creating the script at {}. Make sure that \
             you can save a file in that location.",
            path.display(),
        )
    })?;
    println!(
        ":: Created a script at {}",
        colour::cyan(&path.display().to_string()),
    );
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RemoteDetails {
    version: u32,
    date: String,
    description: String,
}

fn print_version_info() {
    println!(
        "{}",
        colour::magenta(&format!("{LANG_NAME} {LANG_VERSION}")),
    );
    if let Ok(bin) = std::env::current_exe() {
        println!("Installed to {}", colour::blue(&bin.display().to_string()));
    }
    println!("\n{}", colour::yellow("[Platform]"));
    println!(
        "\t{}{}",
        colour::cyan("Operating System: "),
        std::env::consts::OS,
    );
    println!(
        "\t{}{}",
        colour::cyan("Architecture: "),
        std::env::consts::ARCH,
    );
    println!(
        "\t{}{}",
        colour::cyan("CPUs: "),
        std::thread::available_parallelism().map_or(1, usize::from),
    );

    // Best-effort update check; stay quiet if the network is unhappy.
    if let Some(remote) = fetch_remote_details() {
        if remote.version > LANG_VERSION {
            println!(
                "\n{}\nThere's a new version of {LANG_NAME} available! \
                 Version {} is available, released {}. {}",
                colour::yellow("[New Version]"),
                remote.version,
                remote.date,
                remote.description,
            );
        } else if remote.version == LANG_VERSION {
            println!("\n{}", colour::green("You're up to date!"));
        }
    }
}

fn fetch_remote_details() -> Option<RemoteDetails> {
    let response = ureq::get(UPDATE_URL).call().ok()?;
    response.into_json().ok()
}

/// Token summary for `--dev` runs.
fn print_token_summary(engine: &Engine) {
    let tokens = engine.token_log();
    let token_size = std::mem::size_of::<bistroscript::Token>();
    println!("\n{}", colour::yellow("Token Summary"));
    println!(
        "{} {}",
        colour::cyan(":: Total Tokens (incl. line number tokens):"),
        tokens.len(),
    );
    println!(
        "{} {} bytes (single token: {token_size} bytes)",
        colour::cyan(":: Total Memory Usage of the token log:"),
        tokens.len() * token_size,
    );
}
