//! End-to-end exercise of one profile against a live endpoint.
//!
//! Resets the profile to AVAILABLE, then walks it through downloadOrder and
//! confirmOrder, reading the status back after every call. Meant for test
//! profiles only: it changes the profile's state on the endpoint.

use std::io::Write;

use anyhow::{bail, Result};
use es2plus_client_core::{Es2PlusClient, Transport};
use es2plus_proto::lifecycle::LifecycleState;
use tracing::info;

pub fn run<T: Transport>(client: &Es2PlusClient<T>, iccid: &str, out: &mut impl Write) -> Result<()> {
    let initial = current_state(client, iccid)?;
    writeln!(out, "initial state: {initial}")?;

    let recovered = client.recover_profile(iccid, LifecycleState::Available.as_str())?;
    writeln!(out, "recoverProfile -> {}", recovered.header.execution_status().status)?;
    let cancelled = client.cancel_order(iccid, LifecycleState::Available.as_str())?;
    writeln!(out, "cancelOrder -> {}", cancelled.header.execution_status().status)?;
    expect_state(client, iccid, LifecycleState::Available, out)?;

    client.download_order(iccid)?;
    writeln!(out, "downloadOrder -> ok")?;
    expect_state(client, iccid, LifecycleState::Allocated, out)?;

    client.confirm_order(iccid)?;
    writeln!(out, "confirmOrder -> ok")?;
    expect_state(client, iccid, LifecycleState::Released, out)?;

    info!(%iccid, "smoketest passed");
    writeln!(out, "Success")?;
    Ok(())
}

fn current_state<T: Transport>(client: &Es2PlusClient<T>, iccid: &str) -> Result<String> {
    match client.get_status(iccid)? {
        Some(status) => Ok(status.state),
        None => bail!("profile {iccid} is not known to the endpoint"),
    }
}

fn expect_state<T: Transport>(
    client: &Es2PlusClient<T>,
    iccid: &str,
    expected: LifecycleState,
    out: &mut impl Write,
) -> Result<()> {
    let state = current_state(client, iccid)?;
    writeln!(out, "state: {state}")?;
    if state != expected.as_str() {
        bail!("expected profile {iccid} to be {expected}, endpoint reports '{state}'");
    }
    Ok(())
}
