//! ES2+ profile operations.
//!
//! `Es2PlusClient` binds a [`Transport`] to a requester identifier and
//! exposes one method per ES2+ function. Every method is a single blocking
//! round trip:
//!
//! - build a header with a fresh call identifier
//! - encode the request (nothing is sent if this fails)
//! - execute it on the transport
//! - decode the response and apply the operation's success rule

use es2plus_proto::codec;
use es2plus_proto::wire::{
    CancelOrderRequest, CancelOrderResponse, ConfirmOrderRequest, ConfirmOrderResponse,
    DownloadOrderRequest, DownloadOrderResponse, Es2Response, GetProfileStatusRequest,
    GetProfileStatusResponse, Operation, ProfileStatus, RecoverProfileRequest,
    RecoverProfileResponse, RequestHeader,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ClientConfig, DebugOptions};
use crate::error::{ClientError, Result};
use crate::transport::{HttpsTransport, Transport};

/// Client for one administration endpoint.
///
/// Holds no mutable state: it is `Send + Sync` whenever its transport is, and
/// can be shared by reference across threads.
pub struct Es2PlusClient<T = HttpsTransport> {
    transport: T,
    requester_id: String,
    debug: DebugOptions,
}

impl Es2PlusClient<HttpsTransport> {
    /// Connect with the four operator-supplied values and default settings.
    pub fn connect(
        cert_path: &str,
        key_path: &str,
        endpoint: &str,
        requester_id: &str,
    ) -> Result<Self> {
        Self::from_config(&ClientConfig::new(cert_path, key_path, endpoint, requester_id))
    }

    /// Build the HTTPS transport described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpsTransport::new(config)?;
        Ok(Self::with_transport(
            transport,
            &config.requester_id,
            config.debug,
        ))
    }
}

impl<T: Transport> Es2PlusClient<T> {
    pub fn with_transport(transport: T, requester_id: &str, debug: DebugOptions) -> Self {
        Self {
            transport,
            requester_id: requester_id.to_string(),
            debug,
        }
    }

    pub fn requester_id(&self) -> &str {
        &self.requester_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A request header with a new call identifier.
    pub fn new_header(&self) -> Result<RequestHeader> {
        Ok(codec::build_header(&self.requester_id)?)
    }

    fn invoke<Req, Resp>(&self, operation: Operation, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned + Es2Response,
    {
        let payload = codec::encode(operation, request)?;
        if self.debug.print_payload {
            info!(%operation, payload = %String::from_utf8_lossy(&payload), "ES2+ request body");
        }

        let body = self.transport.execute(operation, &payload)?;
        if self.debug.print_payload {
            info!(%operation, payload = %String::from_utf8_lossy(&body), "ES2+ response body");
        }

        let response: Resp = codec::decode(operation, &body)?;
        debug!(
            %operation,
            status = %response.header().execution_status().status,
            "ES2+ call completed"
        );
        Ok(response)
    }

    /// Current status of the profile with `iccid`.
    ///
    /// Returns `None` if the endpoint reports no profile for it, and an
    /// [`ClientError::AmbiguousStatus`] if it reports more than one. A single
    /// entry for a different ICCID is [`ClientError::IccidMismatch`].
    pub fn get_status(&self, iccid: &str) -> Result<Option<ProfileStatus>> {
        let request = GetProfileStatusRequest::for_iccid(self.new_header()?, iccid);
        let response: GetProfileStatusResponse =
            self.invoke(Operation::GetProfileStatus, &request)?;

        let mut statuses = response.profile_status_list;
        match statuses.len() {
            0 => {
                info!(%iccid, "no profile status reported");
                Ok(None)
            }
            1 => {
                let status = statuses.remove(0);
                if status.iccid != iccid {
                    return Err(ClientError::IccidMismatch {
                        requested: iccid.to_string(),
                        reported: status.iccid,
                    });
                }
                Ok(Some(status))
            }
            count => Err(ClientError::AmbiguousStatus {
                iccid: iccid.to_string(),
                count,
            }),
        }
    }

    /// Ask the endpoint to move the profile back to `target_state`.
    ///
    /// The target is not validated and the declared status is not checked.
    pub fn recover_profile(&self, iccid: &str, target_state: &str) -> Result<RecoverProfileResponse> {
        let request = RecoverProfileRequest {
            header: self.new_header()?,
            iccid: iccid.to_string(),
            profile_status: target_state.to_string(),
        };
        self.invoke(Operation::RecoverProfile, &request)
    }

    /// Cancel a pending order, leaving the profile in `target_state`.
    ///
    /// The target is not validated and the declared status is not checked.
    pub fn cancel_order(&self, iccid: &str, target_state: &str) -> Result<CancelOrderResponse> {
        let request = CancelOrderRequest {
            header: self.new_header()?,
            iccid: iccid.to_string(),
            final_profile_status_indicator: target_state.to_string(),
        };
        self.invoke(Operation::CancelOrder, &request)
    }

    /// Reserve the profile with `iccid` (AVAILABLE to ALLOCATED).
    pub fn download_order(&self, iccid: &str) -> Result<DownloadOrderResponse> {
        let request = DownloadOrderRequest::for_iccid(self.new_header()?, iccid);
        let response: DownloadOrderResponse = self.invoke(Operation::DownloadOrder, &request)?;
        require_success(Operation::DownloadOrder, response)
    }

    /// Confirm and release the profile with `iccid` (ALLOCATED to RELEASED).
    pub fn confirm_order(&self, iccid: &str) -> Result<ConfirmOrderResponse> {
        let request = ConfirmOrderRequest::release(self.new_header()?, iccid);
        let response: ConfirmOrderResponse = self.invoke(Operation::ConfirmOrder, &request)?;
        require_success(Operation::ConfirmOrder, response)
    }
}

fn require_success<R: Es2Response>(operation: Operation, response: R) -> Result<R> {
    let status = response.header().execution_status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ClientError::ExecutionStatus {
        operation,
        status: status.status.clone(),
        status_code_data: status.status_code_data.clone(),
    })
}
