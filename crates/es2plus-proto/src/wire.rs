//! ES2+ JSON envelopes.
//!
//! Every request starts with a [`RequestHeader`] and every response with a
//! [`ResponseHeader`]; the remaining fields are specific to the function being
//! invoked. Field names follow the wire format, so all structs rename to
//! camelCase except where the endpoint itself deviates from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lifecycle::LifecycleState;

/// Base path of the ES2+ functions on an administration endpoint.
pub const ES2PLUS_BASE_PATH: &str = "/gsma/rsp2/es2plus";

/// Declared execution status literals (`functionExecutionStatus.status`).
pub mod execution_status {
    pub const EXECUTED_SUCCESS: &str = "Executed-Success";
    pub const EXECUTED_WITH_WARNING: &str = "Executed-WithWarning";
    pub const FAILED: &str = "Failed";
    pub const EXPIRED: &str = "Expired";
}

/// The ES2+ functions this client invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetProfileStatus,
    RecoverProfile,
    CancelOrder,
    DownloadOrder,
    ConfirmOrder,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::GetProfileStatus,
        Operation::RecoverProfile,
        Operation::CancelOrder,
        Operation::DownloadOrder,
        Operation::ConfirmOrder,
    ];

    /// Function name as it appears in the endpoint path.
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::GetProfileStatus => "getProfileStatus",
            Operation::RecoverProfile => "recoverProfile",
            Operation::CancelOrder => "cancelOrder",
            Operation::DownloadOrder => "downloadOrder",
            Operation::ConfirmOrder => "confirmOrder",
        }
    }

    /// Path of this function relative to the endpoint origin.
    pub fn path(self) -> String {
        format!("{ES2PLUS_BASE_PATH}/{}", self.as_str())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Header sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeader {
    /// Identifies the operator; constant for one client.
    pub function_requester_identifier: String,
    /// Correlation token, unique per outbound message.
    pub function_call_identifier: String,
}

/// Header carried by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub function_execution_status: FunctionExecutionStatus,
}

impl ResponseHeader {
    /// A header declaring `status` with no status code data.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            function_execution_status: FunctionExecutionStatus {
                status: status.into(),
                status_code_data: None,
            },
        }
    }

    /// A header declaring `Executed-Success`.
    pub fn success() -> Self {
        Self::new(execution_status::EXECUTED_SUCCESS)
    }

    pub fn execution_status(&self) -> &FunctionExecutionStatus {
        &self.function_execution_status
    }
}

/// The endpoint's declared outcome of a function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExecutionStatus {
    /// Literal status, e.g. `Executed-Success` or `Failed`.
    pub status: String,
    /// Present on failures and diagnostic responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_data: Option<StatusCodeData>,
}

impl FunctionExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == execution_status::EXECUTED_SUCCESS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusCodeData {
    pub subject_code: String,
    pub reason_code: String,
    pub subject_identifier: String,
    pub message: String,
}

impl fmt::Display for StatusCodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subject={} reason={} subjectIdentifier={} message={}",
            self.subject_code, self.reason_code, self.subject_identifier, self.message
        )
    }
}

/// Implemented by every response envelope.
pub trait Es2Response {
    fn header(&self) -> &ResponseHeader;
}

macro_rules! impl_es2_response {
    ($($ty:ty),* $(,)?) => {
        $(impl Es2Response for $ty {
            fn header(&self) -> &ResponseHeader {
                &self.header
            }
        })*
    };
}

// ---------------------------------------------------------------------------
// getProfileStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProfileStatusRequest {
    pub header: RequestHeader,
    pub iccid_list: Vec<IccidEntry>,
}

impl GetProfileStatusRequest {
    /// A status query for a single ICCID.
    pub fn for_iccid(header: RequestHeader, iccid: &str) -> Self {
        Self {
            header,
            iccid_list: vec![IccidEntry {
                iccid: iccid.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IccidEntry {
    pub iccid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProfileStatusResponse {
    pub header: ResponseHeader,
    #[serde(default)]
    pub profile_status_list: Vec<ProfileStatus>,
    #[serde(default)]
    pub completion_timestamp: String,
}

/// Status of one profile as reported by the endpoint.
///
/// Never cached: every read is a full round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStatus {
    pub iccid: String,
    #[serde(default)]
    pub eid: String,
    /// Server-defined state; see [`LifecycleState`] for the values this
    /// client can drive.
    pub state: String,
    /// Activation code token. Empty until the profile is released.
    #[serde(rename = "acToken", default)]
    pub ac_token: String,
    #[serde(rename = "lockFlag", default)]
    pub lock_flag: bool,
    // The endpoint uses snake_case for this one field.
    #[serde(default)]
    pub status_last_update_timestamp: String,
}

impl ProfileStatus {
    /// A profile with an activation token needs no further lifecycle steps.
    pub fn is_activated(&self) -> bool {
        !self.ac_token.is_empty()
    }

    /// The reported state, if it is one the activation table knows.
    pub fn lifecycle_state(&self) -> Option<LifecycleState> {
        LifecycleState::from_wire(&self.state)
    }
}

// ---------------------------------------------------------------------------
// recoverProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverProfileRequest {
    pub header: RequestHeader,
    pub iccid: String,
    /// Target state, passed through unchecked.
    pub profile_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverProfileResponse {
    pub header: ResponseHeader,
}

// ---------------------------------------------------------------------------
// cancelOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub header: RequestHeader,
    pub iccid: String,
    /// Target state, passed through unchecked.
    pub final_profile_status_indicator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderResponse {
    pub header: ResponseHeader,
}

// ---------------------------------------------------------------------------
// downloadOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOrderRequest {
    pub header: RequestHeader,
    pub iccid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
}

impl DownloadOrderRequest {
    /// A download order for a known ICCID, leaving EID and profile type to the endpoint.
    pub fn for_iccid(header: RequestHeader, iccid: &str) -> Self {
        Self {
            header,
            iccid: iccid.to_string(),
            eid: None,
            profile_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOrderResponse {
    pub header: ResponseHeader,
    #[serde(default)]
    pub iccid: String,
}

// ---------------------------------------------------------------------------
// confirmOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderRequest {
    pub header: RequestHeader,
    pub iccid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smdp_address: Option<String>,
    pub release_flag: bool,
}

impl ConfirmOrderRequest {
    /// A confirmation that also releases the profile for download.
    pub fn release(header: RequestHeader, iccid: &str) -> Self {
        Self {
            header,
            iccid: iccid.to_string(),
            eid: None,
            matching_id: None,
            confirmation_code: None,
            smdp_address: None,
            release_flag: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderResponse {
    pub header: ResponseHeader,
    #[serde(default)]
    pub iccid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub eid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub matching_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub smdp_address: String,
}

impl_es2_response!(
    GetProfileStatusResponse,
    RecoverProfileResponse,
    CancelOrderResponse,
    DownloadOrderResponse,
    ConfirmOrderResponse,
);
