//! Writes a fresh candidtest CA certificate, leaf key and leaf certificate as PEM files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use candidtest_certs::generator::CertificateGenerator;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Generate certificates for candidtest to use when serving with TLS
#[derive(Debug, Parser)]
#[command(name = "generate-certs")]
struct CliArgs {
    /// Directory to write ca.pem, key.pem and cert.pem into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let certs = CertificateGenerator::default()
        .generate()
        .context("generating certificates")?;
    certs
        .write_to_dir(&args.output)
        .with_context(|| format!("writing certificates to {}", args.output.display()))?;

    tracing::info!(output = %args.output.display(), "certificates written");
    Ok(())
}
