// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! sqlift command-line interface.
//!
//! Reads a SQL schema file, parses it, and writes any diagnostics to
//! stderr. The exit code is non-zero iff diagnostics exist, so the binary
//! slots directly into CI schema checks.

use camino::Utf8PathBuf;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::debug;

use sqlift_core::diagnostics::Renderer;
use sqlift_core::source_analysis::{SourceFile, parse};

/// sqlift: SQLite schema parser and migration front-end
#[derive(Debug, Parser)]
#[command(name = "sqlift")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQL schema file to check
    path: Utf8PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber only if RUST_LOG is explicitly set.
    // This avoids stderr interference with diagnostic output.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.path))?;

    let source = SourceFile::new(cli.path.as_str(), text);
    let (statements, reports) = parse(&source);
    debug!(
        statements = statements.len(),
        diagnostics = reports.len(),
        "parsed schema"
    );

    let renderer = Renderer::new();
    for report in &reports {
        eprint!("{}", renderer.render(report, &source));
    }

    if reports.is_empty() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
