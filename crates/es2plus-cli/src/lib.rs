//! ES2+ operator CLI.
//!
//! Thin command layer over `es2plus-client-core`: argument parsing,
//! connection settings, and the one-line output format operators script
//! against. Commands run against any [`Transport`], so they can be exercised
//! without an endpoint.

pub mod bulk;
pub mod connection;
pub mod smoketest;

#[cfg(test)]
mod test_support;

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use es2plus_client_core::{Es2PlusClient, Transport};
use es2plus_proto::lifecycle::LifecycleState;
use es2plus_proto::wire::{Es2Response, Operation};

pub use connection::ConnectionArgs;

/// es2plus - SIM profile administration over ES2+
#[derive(Parser, Debug)]
#[command(name = "es2plus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the state and activation token of a profile
    GetStatus { iccid: String },

    /// Move a profile back to a target state
    RecoverProfile {
        iccid: String,
        #[arg(default_value = "AVAILABLE")]
        target_state: String,
    },

    /// Cancel a pending order
    #[command(alias = "cancel-profile")]
    CancelOrder {
        iccid: String,
        #[arg(default_value = "AVAILABLE")]
        target_state: String,
    },

    /// Reserve a profile (AVAILABLE to ALLOCATED)
    DownloadOrder { iccid: String },

    /// Confirm and release a profile (ALLOCATED to RELEASED)
    ConfirmOrder { iccid: String },

    /// Drive a profile to its activated state and print its token
    ActivateIccid { iccid: String },

    /// Activate every ICCID listed in a file, one per line
    BulkActivateIccids {
        file: PathBuf,

        /// Activations in flight at once
        #[arg(long, default_value = "8")]
        parallelism: NonZeroUsize,
    },

    /// Recover, download and confirm one profile, checking state in between
    Smoketest { iccid: String },
}

impl Cli {
    /// Connect and run the command, writing results to stdout.
    pub fn run(self) -> Result<ExitCode> {
        let config = self.connection.resolve()?;
        let client = Es2PlusClient::from_config(&config)
            .with_context(|| format!("cannot set up client for {}", config.endpoint))?;
        let stdout = std::io::stdout();
        let completed = execute(self.command, &client, &mut stdout.lock())?;
        Ok(if completed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// Run one command against `client`, writing results to `out`.
///
/// Returns `false` when the command ran but left some profile short of the
/// requested outcome (an activation that did not finish).
pub fn execute<T: Transport>(
    command: Commands,
    client: &Es2PlusClient<T>,
    out: &mut impl Write,
) -> Result<bool> {
    match command {
        Commands::GetStatus { iccid } => {
            let Some(status) = client.get_status(&iccid)? else {
                bail!("profile {iccid} is not known to the endpoint");
            };
            writeln!(
                out,
                "iccid='{iccid}', state='{}', acToken='{}'",
                status.state, status.ac_token
            )?;
        }
        Commands::RecoverProfile {
            iccid,
            target_state,
        } => {
            check_target_state(&target_state)?;
            let response = client.recover_profile(&iccid, &target_state)?;
            print_status(out, Operation::RecoverProfile, &response)?;
        }
        Commands::CancelOrder {
            iccid,
            target_state,
        } => {
            check_target_state(&target_state)?;
            let response = client.cancel_order(&iccid, &target_state)?;
            print_status(out, Operation::CancelOrder, &response)?;
        }
        Commands::DownloadOrder { iccid } => {
            let response = client.download_order(&iccid)?;
            print_status(out, Operation::DownloadOrder, &response)?;
        }
        Commands::ConfirmOrder { iccid } => {
            let response = client.confirm_order(&iccid)?;
            print_status(out, Operation::ConfirmOrder, &response)?;
            if !response.smdp_address.is_empty() || !response.matching_id.is_empty() {
                writeln!(
                    out,
                    "smdpAddress='{}', matchingId='{}'",
                    response.smdp_address, response.matching_id
                )?;
            }
        }
        Commands::ActivateIccid { iccid } => {
            let activation = client.activate(&iccid)?;
            writeln!(out, "{iccid}, {}", activation.status.ac_token)?;
            if !activation.is_activated() {
                tracing::warn!(%iccid, disposition = ?activation.disposition, "profile not activated");
                return Ok(false);
            }
        }
        Commands::BulkActivateIccids { file, parallelism } => {
            let iccids = bulk::read_iccids(&file)?;
            let outcomes = bulk::activate_all(client, &iccids, parallelism);
            return bulk::report(&outcomes, out);
        }
        Commands::Smoketest { iccid } => {
            smoketest::run(client, &iccid, out)?;
        }
    }
    Ok(true)
}

/// Recover and cancel accept only AVAILABLE as a target today.
fn check_target_state(target: &str) -> Result<()> {
    if LifecycleState::from_wire(target) != Some(LifecycleState::Available) {
        bail!(
            "target state '{target}' unexpected, legal value(s): '{}'",
            LifecycleState::Available
        );
    }
    Ok(())
}

fn print_status(out: &mut impl Write, operation: Operation, response: &impl Es2Response) -> Result<()> {
    let status = response.header().execution_status();
    match &status.status_code_data {
        Some(data) => writeln!(out, "{operation} -> {} ({data})", status.status)?,
        None => writeln!(out, "{operation} -> {}", status.status)?,
    }
    Ok(())
}
