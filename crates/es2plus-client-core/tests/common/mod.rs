//! Shared test fixtures: an in-memory administration endpoint.
//!
//! `StubEndpoint` implements [`Transport`] by decoding the request JSON and
//! answering the way an endpoint would, with knobs to override the declared
//! status per operation, stall state changes, serve raw bodies or go offline.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use es2plus_client_core::error::{ClientError, Result};
use es2plus_client_core::{DebugOptions, Es2PlusClient, Transport};
use es2plus_proto::wire::Operation;
use serde_json::{json, Value};

pub const ICCID: &str = "8965030119040000067";

/// Init tracing subscriber (idempotent across tests via try_init).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
pub struct StubProfile {
    pub state: String,
    pub ac_token: String,
}

#[derive(Default)]
struct Inner {
    profiles: HashMap<String, Vec<StubProfile>>,
    declared: HashMap<Operation, String>,
    frozen: bool,
    raw: HashMap<Operation, Vec<u8>>,
    offline: bool,
    calls: Vec<(Operation, Value)>,
}

#[derive(Default)]
pub struct StubEndpoint {
    inner: Mutex<Inner>,
}

impl StubEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile; registering the same ICCID twice makes status
    /// queries for it ambiguous.
    pub fn with_profile(self, iccid: &str, state: &str, ac_token: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .profiles
            .entry(iccid.to_string())
            .or_default()
            .push(StubProfile {
                state: state.to_string(),
                ac_token: ac_token.to_string(),
            });
        self
    }

    /// Declare `status` for every call to `operation` without changing state.
    pub fn declaring(self, operation: Operation, status: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .declared
            .insert(operation, status.to_string());
        self
    }

    /// Accept mutating calls without moving any profile.
    pub fn frozen(self) -> Self {
        self.inner.lock().unwrap().frozen = true;
        self
    }

    /// Answer `operation` with `body` verbatim.
    pub fn raw(self, operation: Operation, body: &[u8]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .raw
            .insert(operation, body.to_vec());
        self
    }

    /// Fail every call at the transport level.
    pub fn offline(self) -> Self {
        self.inner.lock().unwrap().offline = true;
        self
    }

    pub fn calls(&self) -> Vec<(Operation, Value)> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls().into_iter().map(|(op, _)| op).collect()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.operations().iter().filter(|op| **op == operation).count()
    }

    pub fn client(self) -> Es2PlusClient<StubEndpoint> {
        Es2PlusClient::with_transport(self, "ACME", DebugOptions::default())
    }
}

fn header(status: &str) -> Value {
    json!({"functionExecutionStatus": {"status": status}})
}

impl Transport for StubEndpoint {
    fn execute(&self, operation: Operation, payload: &[u8]) -> Result<Vec<u8>> {
        let request: Value = serde_json::from_slice(payload).expect("client sent JSON");
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((operation, request.clone()));

        if inner.offline {
            return Err(ClientError::Transport {
                operation,
                message: "connection refused".into(),
            });
        }
        if let Some(body) = inner.raw.get(&operation) {
            return Ok(body.clone());
        }

        let declared = inner.declared.get(&operation).cloned();
        let status = declared.as_deref().unwrap_or("Executed-Success");

        let response = match operation {
            Operation::GetProfileStatus => {
                let iccid = request["iccidList"][0]["iccid"].as_str().unwrap_or_default();
                let list: Vec<Value> = inner
                    .profiles
                    .get(iccid)
                    .into_iter()
                    .flatten()
                    .map(|p| {
                        json!({
                            "iccid": iccid,
                            "state": p.state,
                            "acToken": p.ac_token,
                            "lockFlag": false,
                            "status_last_update_timestamp": "2019-10-24T12:00:00Z"
                        })
                    })
                    .collect();
                json!({"header": header(status), "profileStatusList": list})
            }
            Operation::DownloadOrder | Operation::ConfirmOrder => {
                let iccid = request["iccid"].as_str().unwrap_or_default().to_string();
                if declared.is_none() && !inner.frozen {
                    if let Some(profile) =
                        inner.profiles.get_mut(&iccid).and_then(|p| p.first_mut())
                    {
                        if operation == Operation::DownloadOrder {
                            profile.state = "ALLOCATED".into();
                        } else {
                            profile.state = "RELEASED".into();
                            profile.ac_token = format!("1$SMDP.EXAMPLE.COM${iccid}");
                        }
                    }
                }
                json!({"header": header(status), "iccid": iccid})
            }
            Operation::RecoverProfile | Operation::CancelOrder => {
                json!({"header": header(status)})
            }
        };
        Ok(serde_json::to_vec(&response).expect("stub response serializes"))
    }
}
