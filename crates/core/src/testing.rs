//! Test doubles shared by the controller tests.

use crate::config::{ApiConfig, ConfigStore};
use crate::error::{IntakeError, IntakeResult};
use crate::http::{HttpClient, JsonRequest};
use crate::storage::MemoryKeyValueStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Scripted {
    Ok(Value),
    Status(u16, Value),
}

/// [`HttpClient`] that replays scripted responses in order and records every request.
///
/// A request with nothing scripted fails with a 500 so a missing script is loud.
#[derive(Default)]
pub(crate) struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<JsonRequest>>,
}

impl ScriptedHttpClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond_ok(&self, body: Value) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Scripted::Ok(body));
    }

    pub(crate) fn respond_status(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Scripted::Status(status, body));
    }

    pub(crate) fn requests(&self) -> Vec<JsonRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn request_json(&self, request: JsonRequest) -> IntakeResult<Value> {
        self.requests.lock().expect("requests lock").push(request);
        let next = self.responses.lock().expect("responses lock").pop_front();

        match next {
            Some(Scripted::Ok(body)) => Ok(body),
            Some(Scripted::Status(status, body)) => Err(IntakeError::from_error_body(
                status,
                body.to_string().as_bytes(),
            )),
            None => Err(IntakeError::from_error_body(500, b"")),
        }
    }
}

/// Config store with both registries configured.
pub(crate) fn configured_store() -> Arc<ConfigStore> {
    let store = ConfigStore::new(Arc::new(MemoryKeyValueStore::new()));
    store
        .save(&ApiConfig::new("http://patients.test", "http://triages.test"))
        .expect("save test config");
    Arc::new(store)
}
