//! Bulk activation.
//!
//! ICCIDs are read from a file, one per line, and activated concurrently on
//! scoped threads sharing one client. Workers pull the next ICCID from a
//! shared index; outcomes are collected under a mutex and reported in input
//! order. One failure does not stop the others.

use std::fs;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use anyhow::{Context, Result};
use es2plus_client_core::error::Result as ClientResult;
use es2plus_client_core::{Activation, Es2PlusClient, Transport};
use tracing::{info, warn};

/// Result of activating one ICCID.
#[derive(Debug)]
pub struct BulkOutcome {
    pub iccid: String,
    pub result: ClientResult<Activation>,
}

impl BulkOutcome {
    pub fn is_activated(&self) -> bool {
        self.result.as_ref().is_ok_and(Activation::is_activated)
    }
}

/// ICCIDs listed in `path`, one per line. Surrounding whitespace is trimmed
/// and blank lines are skipped.
pub fn read_iccids(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Activate every ICCID with at most `parallelism` activations in flight.
pub fn activate_all<T: Transport>(
    client: &Es2PlusClient<T>,
    iccids: &[String],
    parallelism: NonZeroUsize,
) -> Vec<BulkOutcome> {
    let workers = parallelism.get().min(iccids.len());
    info!(count = iccids.len(), workers, "starting bulk activation");

    let next = AtomicUsize::new(0);
    let outcomes = Mutex::new(Vec::with_capacity(iccids.len()));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(iccid) = iccids.get(index) else {
                    break;
                };
                let result = client.activate(iccid);
                if let Err(e) = &result {
                    warn!(%iccid, error = %e, "activation failed");
                }
                let outcome = BulkOutcome {
                    iccid: iccid.clone(),
                    result,
                };
                outcomes
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push((index, outcome));
            });
        }
    });

    let mut outcomes = outcomes
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Print one line per ICCID. Returns `true` if every profile ended activated.
pub fn report(outcomes: &[BulkOutcome], out: &mut impl Write) -> Result<bool> {
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(activation) => {
                writeln!(out, "{}, {}", outcome.iccid, activation.status.ac_token)?;
                if !activation.is_activated() {
                    failed += 1;
                }
            }
            Err(e) => {
                writeln!(out, "{}, error: {e}", outcome.iccid)?;
                failed += 1;
            }
        }
    }
    info!(total = outcomes.len(), failed, "bulk activation finished");
    Ok(failed == 0)
}
