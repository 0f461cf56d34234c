//! es2plus
//!
//! Operator CLI for SIM profile administration over ES2+.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use es2plus_cli::Cli;

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
