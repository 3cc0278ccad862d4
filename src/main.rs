use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::info;

use rlox::error::LoxError;
use rlox::Lox;

// Exit codes follow the BSD sysexits convention the test harness expects.
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
struct Cli {
    /// Script to run; starts a REPL when omitted.
    script: Option<PathBuf>,
}

/// Reads the contents of a file into a String.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    String::from_utf8(buf).context("Source is not valid UTF-8")
}

fn report(errors: &[LoxError]) {
    for error in errors {
        eprintln!("{}", error);
    }
}

fn run_file(path: &PathBuf) -> Result<ExitCode> {
    let source = read_file(path)?;
    let mut lox = Lox::new();

    match lox.run(&source) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(errors) => {
            report(&errors);

            // Scan/parse/resolve failures and runtime failures map to
            // distinct exit codes.
            if errors.iter().any(|e| e.is_static()) {
                Ok(ExitCode::from(EX_DATAERR))
            } else {
                Ok(ExitCode::from(EX_SOFTWARE))
            }
        }
    }
}

/// Line-at-a-time REPL.  The session (globals, defined functions and
/// classes) survives across lines; errors are reported and forgotten.
fn run_prompt() -> Result<ExitCode> {
    let mut lox = Lox::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        if let Err(errors) = lox.run(&line) {
            report(&errors);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too; only genuine usage
            // mistakes get the usage exit code.
            e.print()?;
            let code = if e.use_stderr() { EX_USAGE } else { 0 };
            return Ok(ExitCode::from(code));
        }
    };

    info!("CLI arguments: {:?}", cli);

    match cli.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}
