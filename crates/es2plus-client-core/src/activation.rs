//! Profile activation.
//!
//! Drives a profile along the lifecycle transition table until it carries an
//! activation token or reaches a state with no outgoing transition. Each
//! step runs at most once per activation, and the returned status is always
//! re-read from the endpoint after the last step, even when no step ran.

use es2plus_proto::lifecycle::{transition_from, LifecycleStep};
use es2plus_proto::wire::ProfileStatus;
use tracing::{info, warn};

use crate::client::Es2PlusClient;
use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// How an activation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The profile already had an activation token; nothing was changed.
    AlreadyActivated,

    /// The profile reached a state with no further transition.
    Completed,

    /// The endpoint reported a state outside the transition table.
    UnrecognizedState(String),

    /// A step was already taken in this activation, but the endpoint still
    /// reports the state it should have left.
    Stalled(String),
}

/// Outcome of [`Es2PlusClient::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Status re-read after the last step.
    pub status: ProfileStatus,

    /// Mutating steps performed, in order.
    pub steps: Vec<LifecycleStep>,

    pub disposition: Disposition,
}

impl Activation {
    pub fn is_activated(&self) -> bool {
        self.status.is_activated()
    }
}

impl<T: Transport> Es2PlusClient<T> {
    /// Bring the profile with `iccid` to its activated state.
    ///
    /// Any query or step failure aborts the activation and is returned; steps
    /// already taken are not rolled back. A profile left ALLOCATED resumes
    /// with confirmOrder on the next call.
    pub fn activate(&self, iccid: &str) -> Result<Activation> {
        let mut status = self.require_status(iccid)?;
        let mut steps = Vec::new();

        let disposition = if status.is_activated() {
            info!(%iccid, state = %status.state, "profile already activated");
            Disposition::AlreadyActivated
        } else {
            loop {
                let Some(state) = status.lifecycle_state() else {
                    warn!(%iccid, state = %status.state, "no lifecycle transition for reported state");
                    break Disposition::UnrecognizedState(status.state.clone());
                };
                let Some(transition) = transition_from(state) else {
                    break Disposition::Completed;
                };
                if steps.contains(&transition.step) {
                    warn!(%iccid, %state, step = %transition.step, "profile did not leave state after step");
                    break Disposition::Stalled(status.state.clone());
                }

                info!(%iccid, from = %state, to = %transition.to, step = %transition.step, "applying lifecycle step");
                self.apply(transition.step, iccid)?;
                steps.push(transition.step);

                if transition.to.is_terminal() {
                    break Disposition::Completed;
                }
                status = self.require_status(iccid)?;
            }
        };

        let status = self.require_status(iccid)?;
        info!(
            %iccid,
            state = %status.state,
            activated = status.is_activated(),
            steps = steps.len(),
            "activation finished"
        );
        Ok(Activation {
            status,
            steps,
            disposition,
        })
    }

    fn apply(&self, step: LifecycleStep, iccid: &str) -> Result<()> {
        match step {
            LifecycleStep::DownloadOrder => self.download_order(iccid).map(drop),
            LifecycleStep::ConfirmOrder => self.confirm_order(iccid).map(drop),
        }
    }

    fn require_status(&self, iccid: &str) -> Result<ProfileStatus> {
        self.get_status(iccid)?
            .ok_or_else(|| ClientError::ProfileNotFound(iccid.to_string()))
    }
}
