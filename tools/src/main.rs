use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gridsync_tools::{
    format_object_pretty, inspect_compressed, inspect_texture_entry, parse_hex,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gridsync-inspect",
    version,
    about = "Decode gridsync texture entries and object updates"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a serialized texture entry.
    Te {
        #[command(flatten)]
        input: Input,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Decode the data of an ObjectUpdateCompressed block.
    Compressed {
        #[command(flatten)]
        input: Input,
        /// UpdateFlags field of the block.
        #[arg(long, default_value_t = 0)]
        update_flags: u32,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Args)]
struct Input {
    /// Hex-encoded bytes.
    hex: Option<String>,
    /// Read raw bytes from a file instead.
    #[arg(long, conflicts_with = "hex")]
    file: Option<PathBuf>,
}

impl Input {
    fn bytes(&self) -> Result<Vec<u8>> {
        match (&self.hex, &self.file) {
            (Some(hex), _) => parse_hex(hex).context("parse hex input"),
            (None, Some(path)) => {
                fs::read(path).with_context(|| format!("read {}", path.display()))
            }
            (None, None) => bail!("pass hex bytes or --file"),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Te { input, format } => {
            let bytes = input.bytes()?;
            debug!(len = bytes.len(), "decoding texture entry");
            let report = inspect_texture_entry(&bytes)?;
            match format {
                Format::Json => print_json(&report)?,
                Format::Pretty => {
                    println!(
                        "{} bytes, {} face overrides",
                        report.byte_len, report.override_count
                    );
                    print_json(&report.entry)?;
                }
            }
        }
        Command::Compressed {
            input,
            update_flags,
            format,
        } => {
            let bytes = input.bytes()?;
            debug!(len = bytes.len(), update_flags, "decoding compressed update");
            let report = inspect_compressed(&bytes, update_flags)?;
            match format {
                Format::Json => print_json(&report)?,
                Format::Pretty => print!("{}", format_object_pretty(&report)),
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{json}");
    Ok(())
}
