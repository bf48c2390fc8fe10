//! Packaging-side bulk encryption tool.
//!
//! The passphrase given here must match the one the application injects into
//! its registry; the provider decrypts at request time whatever this tool
//! encrypted at packaging time.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use tracing::info;

use veil_core::{crypto, encryptor, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolMode {
    Encrypt,
    Decrypt,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Veil asset encryption tool", long_about = None)]
struct Cli {
    /// encrypt or decrypt
    #[arg(short, long)]
    mode: Option<String>,

    /// Input file, or directory with --directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, or directory with --directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Shared passphrase; must match the one baked into the application
    #[arg(short, long, default_value = "DefaultKey123")]
    key: String,

    /// Comma-separated extensions processed in directory mode
    #[arg(short, long, default_value = ".qml,.js")]
    extensions: String,

    /// Treat input and output as directory trees
    #[arg(short, long)]
    directory: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    run(cli)
}

// Flags are validated here instead of by the parser so that every failure,
// bad invocation or failed operation alike, exits with code 1.
fn run(cli: Cli) -> Result<()> {
    let mode = parse_mode(cli.mode.as_deref())?;
    let input = cli.input.ok_or_else(|| anyhow!("--input is required"))?;
    let output = cli.output.ok_or_else(|| anyhow!("--output is required"))?;
    if mode == ToolMode::Decrypt && cli.directory {
        return Err(ProviderError::Unsupported("directory decryption").into());
    }
    if !input.exists() {
        bail!("input does not exist: {}", input.display());
    }
    info!(
        mode = ?mode,
        key = %crypto::key_fingerprint(&cli.key),
        input = %input.display(),
        "starting"
    );

    match mode {
        ToolMode::Encrypt if cli.directory => {
            let extensions = parse_extensions(&cli.extensions);
            if extensions.is_empty() {
                bail!("extension filter is empty");
            }
            let count = encryptor::encrypt_directory(&input, &output, &cli.key, &extensions);
            println!("Encrypted {count} file(s) into {}", output.display());
        }
        ToolMode::Encrypt => {
            encryptor::encrypt_file(&input, &output, &cli.key)?;
            println!("Encrypted {} -> {}", input.display(), output.display());
        }
        ToolMode::Decrypt => {
            encryptor::decrypt_file(&input, &output, &cli.key)?;
            println!("Decrypted {} -> {}", input.display(), output.display());
        }
    }
    Ok(())
}

fn parse_mode(raw: Option<&str>) -> Result<ToolMode> {
    match raw {
        Some("encrypt") => Ok(ToolMode::Encrypt),
        Some("decrypt") => Ok(ToolMode::Decrypt),
        Some(other) => Err(anyhow!("unknown mode: {other} (expected encrypt or decrypt)")),
        None => Err(anyhow!("--mode is required (encrypt or decrypt)")),
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.starts_with('.') {
                part.to_string()
            } else {
                format!(".{part}")
            }
        })
        .collect()
}
