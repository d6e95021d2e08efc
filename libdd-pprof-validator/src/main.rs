// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use anyhow::Context;
use clap::Parser;
use libdd_pprof_resolver::{decode, DecodeOptions, Decoded, Severity, ValidationReport};
use std::io::{self, Read, Write};
use std::{fs, path};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Optional path to an uncompressed pprof, otherwise reads from stdin
    input: Option<path::PathBuf>,

    /// JSON file holding the decode options
    #[arg(long)]
    config: Option<path::PathBuf>,

    /// Treat addresses outside of their mapping as fatal
    #[arg(long)]
    strict_addresses: bool,

    /// Print the report instead of failing when fatal findings exist
    #[arg(long)]
    allow_fatal: bool,

    /// Log filter, e.g. "debug" or "libdd_pprof_resolver=trace"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn options(&self) -> anyhow::Result<DecodeOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => DecodeOptions::default(),
        };
        if self.strict_addresses {
            options.validation.address_out_of_range = Severity::Fatal;
        }
        if self.allow_fatal {
            options.reject_fatal = false;
        }
        Ok(options)
    }
}

fn init_logging(filter: &str) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_new(filter).context("parsing log level")?)
        .with_level(true)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber")?;
    Ok(())
}

fn write_report<W: Write>(writer: &mut W, report: &ValidationReport) -> io::Result<()> {
    for finding in report {
        writeln!(writer, "{finding}")?;
    }
    writeln!(
        writer,
        "{} finding(s): {} fatal, {} warning(s)",
        report.len(),
        report.fatal().count(),
        report.warnings().count()
    )
}

fn read_input(input: Option<&path::Path>) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if let Some(path) = input {
        let mut file =
            fs::File::open(path).with_context(|| format!("opening input {}", path.display()))?;
        file
            .read_to_end(&mut buffer)
            .with_context(|| format!("reading input {}", path.display()))?;
    } else {
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("reading stdin")?;
    }
    Ok(buffer)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    let options = cli.options()?;

    let buffer = read_input(cli.input.as_deref())?;
    debug!(bytes = buffer.len(), ?options, "decoding profile");

    let Decoded { profile, report } = decode(&buffer, &options)?;
    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &report)?;
    writeln!(
        stdout,
        "Profile decoded: {} sample(s), {} location(s), {} function(s), {} mapping(s)",
        profile.samples().len(),
        profile.locations().len(),
        profile.functions().len(),
        profile.mappings().len()
    )?;
    Ok(())
}
