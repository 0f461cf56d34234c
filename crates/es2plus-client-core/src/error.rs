//! Error types for the client.

use es2plus_proto::wire::{Operation, StatusCodeData};
use thiserror::Error;

/// Errors that can occur while talking to an administration endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("failed to parse client configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("transport error calling {operation}: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },

    /// The endpoint answered, but declared something other than `Executed-Success`.
    #[error("{operation} execution status was '{status}'")]
    ExecutionStatus {
        operation: Operation,
        status: String,
        status_code_data: Option<StatusCodeData>,
    },

    #[error("getProfileStatus returned {count} profiles for iccid {iccid}")]
    AmbiguousStatus { iccid: String, count: usize },

    #[error("getProfileStatus for iccid {requested} reported iccid {reported}")]
    IccidMismatch { requested: String, reported: String },

    #[error("profile {0} is unknown to the administration endpoint")]
    ProfileNotFound(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] es2plus_proto::ProtoError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
