//! In-memory endpoint for command tests.

use std::collections::HashMap;
use std::sync::Mutex;

use es2plus_client_core::error::Result;
use es2plus_client_core::{DebugOptions, Es2PlusClient, Transport};
use es2plus_proto::wire::Operation;
use serde_json::{json, Value};

pub const ICCID: &str = "8965030119040000067";

/// Tracks profile state per ICCID and moves it the way an endpoint would.
#[derive(Default)]
pub struct Stub {
    profiles: Mutex<HashMap<String, (String, String)>>,
    calls: Mutex<Vec<Operation>>,
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, iccid: &str, state: &str, ac_token: &str) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(iccid.to_string(), (state.to_string(), ac_token.to_string()));
        self
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.operations().iter().filter(|op| **op == operation).count()
    }

    pub fn state(&self, iccid: &str) -> Option<String> {
        self.profiles
            .lock()
            .unwrap()
            .get(iccid)
            .map(|(state, _)| state.clone())
    }

    pub fn client(self) -> Es2PlusClient<Stub> {
        Es2PlusClient::with_transport(self, "ACME", DebugOptions::default())
    }
}

impl Transport for Stub {
    fn execute(&self, operation: Operation, payload: &[u8]) -> Result<Vec<u8>> {
        let request: Value = serde_json::from_slice(payload).expect("client sent JSON");
        self.calls.lock().unwrap().push(operation);

        let success = json!({"functionExecutionStatus": {"status": "Executed-Success"}});
        let mut profiles = self.profiles.lock().unwrap();
        let response = match operation {
            Operation::GetProfileStatus => {
                let iccid = request["iccidList"][0]["iccid"].as_str().unwrap_or_default();
                let list: Vec<Value> = profiles
                    .get(iccid)
                    .map(|(state, token)| json!({"iccid": iccid, "state": state, "acToken": token}))
                    .into_iter()
                    .collect();
                json!({"header": success, "profileStatusList": list})
            }
            Operation::RecoverProfile => {
                let iccid = request["iccid"].as_str().unwrap_or_default();
                let target = request["profileStatus"].as_str().unwrap_or_default();
                if let Some(profile) = profiles.get_mut(iccid) {
                    *profile = (target.to_string(), String::new());
                }
                json!({"header": success})
            }
            Operation::CancelOrder => json!({"header": success}),
            Operation::DownloadOrder | Operation::ConfirmOrder => {
                let iccid = request["iccid"].as_str().unwrap_or_default();
                match profiles.get_mut(iccid) {
                    Some(profile) if operation == Operation::DownloadOrder => {
                        profile.0 = "ALLOCATED".into();
                        json!({"header": success, "iccid": iccid})
                    }
                    Some(profile) => {
                        *profile = ("RELEASED".into(), format!("1$SMDP.EXAMPLE.COM${iccid}"));
                        json!({"header": success, "iccid": iccid})
                    }
                    None => json!({
                        "header": {"functionExecutionStatus": {"status": "Failed"}}
                    }),
                }
            }
        };
        Ok(serde_json::to_vec(&response).expect("stub response serializes"))
    }
}
