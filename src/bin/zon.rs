//! `zon` CLI — convert between JSON and ZON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to ZON (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | zon encode
//!
//! # Encode a file
//! zon encode data.json > data.zonf
//!
//! # Decode ZON back to pretty-printed JSON
//! zon decode data.zonf
//! ```
//!
//! Exit codes: 0 success, 2 usage error, 3 decode error, 4 encode error,
//! 5 I/O error.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_DECODE: u8 = 3;
const EXIT_ENCODE: u8 = 4;
const EXIT_IO: u8 = 5;

#[derive(Parser)]
#[command(name = "zon", version, about = "ZON (Zero Overhead Notation) codec")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to ZON format
    Encode {
        /// Input JSON file (reads from stdin if omitted)
        path: Option<PathBuf>,
    },
    /// Decode ZON to pretty-printed JSON
    Decode {
        /// Input ZON file (reads from stdin if omitted)
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // clap exits with code 2 on usage errors.
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err((code, err)) => {
            eprintln!("zon: {:#}", err);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> std::result::Result<(), (u8, anyhow::Error)> {
    match cli.command {
        Commands::Encode { path } => {
            let json = read_input(path.as_deref()).map_err(|e| (EXIT_IO, e))?;
            let value: serde_json::Value = serde_json::from_str(&json)
                .context("input is not valid JSON")
                .map_err(|e| (EXIT_ENCODE, e))?;
            let text = zon::to_string(&value)
                .context("cannot encode value as ZON")
                .map_err(|e| (EXIT_ENCODE, e))?;
            write_stdout(&text).map_err(|e| (EXIT_IO, e))
        }
        Commands::Decode { path } => {
            let text = read_input(path.as_deref()).map_err(|e| (EXIT_IO, e))?;
            let value = zon::decode(&text)
                .context("input is not valid ZON")
                .map_err(|e| (EXIT_DECODE, e))?;
            let json = serde_json::to_value(&value)
                .and_then(|v| serde_json::to_string_pretty(&v))
                .context("cannot render decoded value as JSON")
                .map_err(|e| (EXIT_DECODE, e))?;
            write_stdout(&json).map_err(|e| (EXIT_IO, e))
        }
    }
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .context("failed to write to stdout")
}
