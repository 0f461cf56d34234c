//! Profile lifecycle states and the activation transition table.
//!
//! The administration endpoint reports a profile's state as a string. The
//! states this client can drive form one chain:
//!
//! ```text
//! AVAILABLE --downloadOrder--> ALLOCATED --confirmOrder--> RELEASED
//! ```
//!
//! Any other reported value is server-defined and has no transition here.

use std::fmt;

use crate::wire::Operation;

/// A profile state the activation table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Available,
    Allocated,
    Released,
}

impl LifecycleState {
    /// Parse the endpoint's state literal. Matching is exact: the endpoint
    /// reports states in upper case.
    pub fn from_wire(state: &str) -> Option<Self> {
        match state {
            "AVAILABLE" => Some(Self::Available),
            "ALLOCATED" => Some(Self::Allocated),
            "RELEASED" => Some(Self::Released),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Allocated => "ALLOCATED",
            Self::Released => "RELEASED",
        }
    }

    /// True if no transition leaves this state.
    pub fn is_terminal(self) -> bool {
        transition_from(self).is_none()
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutating call that moves a profile along the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStep {
    DownloadOrder,
    ConfirmOrder,
}

impl LifecycleStep {
    pub const fn operation(self) -> Operation {
        match self {
            Self::DownloadOrder => Operation::DownloadOrder,
            Self::ConfirmOrder => Operation::ConfirmOrder,
        }
    }
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation().as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleState,
    pub step: LifecycleStep,
    pub to: LifecycleState,
}

/// Every transition the activation algorithm may take.
pub static TRANSITIONS: [Transition; 2] = [
    Transition {
        from: LifecycleState::Available,
        step: LifecycleStep::DownloadOrder,
        to: LifecycleState::Allocated,
    },
    Transition {
        from: LifecycleState::Allocated,
        step: LifecycleStep::ConfirmOrder,
        to: LifecycleState::Released,
    },
];

/// The transition leaving `state`, if any.
pub fn transition_from(state: LifecycleState) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| t.from == state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_literals_roundtrip() {
        for state in [
            LifecycleState::Available,
            LifecycleState::Allocated,
            LifecycleState::Released,
        ] {
            assert_eq!(LifecycleState::from_wire(state.as_str()), Some(state));
        }
    }

    #[test]
    fn unknown_and_lowercase_states_are_unrecognized() {
        assert_eq!(LifecycleState::from_wire("DOWNLOADED"), None);
        assert_eq!(LifecycleState::from_wire("available"), None);
        assert_eq!(LifecycleState::from_wire(""), None);
    }

    #[test]
    fn available_downloads_to_allocated() {
        let t = transition_from(LifecycleState::Available).expect("transition");
        assert_eq!(t.step, LifecycleStep::DownloadOrder);
        assert_eq!(t.to, LifecycleState::Allocated);
    }

    #[test]
    fn allocated_confirms_to_released() {
        let t = transition_from(LifecycleState::Allocated).expect("transition");
        assert_eq!(t.step, LifecycleStep::ConfirmOrder);
        assert_eq!(t.to, LifecycleState::Released);
    }

    #[test]
    fn released_is_the_only_terminal_state() {
        assert!(LifecycleState::Released.is_terminal());
        assert!(!LifecycleState::Available.is_terminal());
        assert!(!LifecycleState::Allocated.is_terminal());
    }

    #[test]
    fn table_forms_a_single_chain() {
        for pair in TRANSITIONS.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn steps_map_to_operations() {
        assert_eq!(LifecycleStep::DownloadOrder.to_string(), "downloadOrder");
        assert_eq!(LifecycleStep::ConfirmOrder.operation(), Operation::ConfirmOrder);
    }
}
