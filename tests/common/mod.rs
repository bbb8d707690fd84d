#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use counterwatch::kernel::artifact::{Artifact, ArtifactId};
use counterwatch::kernel::managed_object::Attributes;
use counterwatch::services::apic::{FabricClient, FetchResponse};
use counterwatch::services::phantom::CaseClient;
use counterwatch::MonitorError;

pub const EPG_TO_IP: &str = "dbgEpgToIpRslt";
pub const IP_TO_EPG: &str = "dbgIpToEpgRslt";

/// A canned reply for one class query.
pub enum Reply {
    Status(u16, String),
    Unreachable,
}

impl Reply {
    pub fn ok(body: String) -> Self {
        Reply::Status(200, body)
    }
}

/// Fabric that answers from per-class queues. An exhausted queue answers with an empty
/// object collection.
pub struct FakeFabric {
    pub accept_login: bool,
    pub logins: u32,
    pub logouts: u32,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeFabric {
    pub fn new() -> Self {
        Self {
            accept_login: true,
            logins: 0,
            logouts: 0,
            replies: Mutex::new(HashMap::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_login() -> Self {
        Self {
            accept_login: false,
            ..Self::new()
        }
    }

    pub fn reply(self, class: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(class.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl FabricClient for FakeFabric {
    fn controller_name(&self) -> &str {
        "fake-apic"
    }

    async fn login(&mut self) -> Result<(), MonitorError> {
        self.logins += 1;
        if self.accept_login {
            Ok(())
        } else {
            Err(MonitorError::Authentication {
                host: "fake-apic".to_string(),
                reason: "status 401 Unauthorized".to_string(),
            })
        }
    }

    async fn logout(&mut self) {
        self.logouts += 1;
    }

    async fn fetch_class(&self, class: &str) -> Result<FetchResponse, MonitorError> {
        self.fetched.lock().unwrap().push(class.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(class)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Status(status, body)) => Ok(FetchResponse { status, body }),
            Some(Reply::Unreachable) => Err(MonitorError::Fetch {
                class: class.to_string(),
                status: None,
                reason: "connection refused".to_string(),
            }),
            None => Ok(FetchResponse {
                status: 200,
                body: class_body(class, &[]),
            }),
        }
    }
}

/// Records submissions; optionally fails every one of them.
#[derive(Default)]
pub struct FakeCase {
    pub fail: bool,
    submitted: Mutex<Vec<(u64, Artifact)>>,
}

impl FakeCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn submitted(&self) -> Vec<(u64, Artifact)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaseClient for FakeCase {
    async fn add_artifact(&self, container_id: u64, artifact: &Artifact) -> Result<ArtifactId, MonitorError> {
        if self.fail {
            return Err(MonitorError::Submission("status 503 Service Unavailable".to_string()));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((container_id, artifact.clone()));
        Ok(submitted.len() as ArtifactId)
    }
}

/// Attributes of an atomic counter result as the controller reports them.
pub fn counter(dn: &str, tx: &str, rx: &str, ts: &str) -> Value {
    json!({
        "dn": dn,
        "src": "10.1.1.10",
        "dst": "10.2.2.20",
        "filtEnt": "tcp",
        "seqNo": "1",
        "ts": ts,
        "totTxP": tx,
        "totRxP": rx,
    })
}

pub fn attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

pub fn class_body(class: &str, objects: &[Value]) -> String {
    let imdata: Vec<Value> = objects
        .iter()
        .map(|attrs| {
            let mut entry = serde_json::Map::new();
            entry.insert(class.to_string(), json!({ "attributes": attrs }));
            Value::Object(entry)
        })
        .collect();
    json!({ "totalCount": imdata.len().to_string(), "imdata": imdata }).to_string()
}
