//! `wexpr` CLI — convert between Wexpr and JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to Wexpr (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | wexpr encode
//!
//! # Encode pretty-printed, forcing a value into <base64> form
//! wexpr encode --pretty --binary-path -.secret -i data.json
//!
//! # Decode Wexpr to pretty-printed JSON
//! wexpr decode -i data.wexpr
//!
//! # Reformat a Wexpr document canonically
//! wexpr fmt -i data.wexpr
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wexpr_core::{json, EncodeOptions};

#[derive(Parser)]
#[command(name = "wexpr", version, about = "Wexpr data format CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to Wexpr
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// One item per line, tab-indented
        #[arg(long)]
        pretty: bool,
        /// Force the string at this path (e.g. `-.key`) into <base64> form;
        /// may be repeated
        #[arg(long = "binary-path", value_name = "PATH", allow_hyphen_values = true)]
        binary_paths: Vec<String>,
    },
    /// Decode Wexpr to pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Reformat a Wexpr document canonically
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Single-line output instead of the pretty default
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            pretty,
            binary_paths,
        } => {
            let source = read_input(input.as_deref())?;
            let text = String::from_utf8(source).context("JSON input must be valid UTF-8")?;
            let parsed: serde_json::Value =
                serde_json::from_str(&text).context("Failed to parse JSON input")?;
            let mut options = EncodeOptions {
                pretty,
                ..EncodeOptions::default()
            };
            options.binary_paths.extend(binary_paths);
            let encoded = wexpr_core::encode_with(&json::from_json(&parsed), &options)
                .context("Failed to encode JSON as Wexpr")?;
            write_output(output.as_deref(), &encoded)?;
        }
        Commands::Decode { input, output } => {
            let source = read_input(input.as_deref())?;
            let value = wexpr_core::decode(&source).context("Failed to decode Wexpr input")?;
            let pretty = serde_json::to_string_pretty(&json::to_json(&value))?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Fmt {
            input,
            output,
            compact,
        } => {
            let source = read_input(input.as_deref())?;
            let value = wexpr_core::decode(&source).context("Failed to decode Wexpr input")?;
            let options = if compact {
                EncodeOptions::default()
            } else {
                EncodeOptions::pretty()
            };
            let formatted = wexpr_core::encode_with(&value, &options)
                .context("Failed to re-encode Wexpr document")?;
            write_output(output.as_deref(), &formatted)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {path}")),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {path}"))?,
        None => println!("{content}"),
    }
    Ok(())
}
