//! Shared fakes for backend client integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cloud_risk_api::{ApiError, ApiRequest, ApiResponse, ApiTransport, BackendClient};

/// Transport replaying scripted responses and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<(String, ApiRequest)>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Queues a response with `status` and JSON `body`.
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .expect("response lock should work")
            .push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
        self
    }

    /// Queues a transport-level failure.
    pub fn fail(&self, error: ApiError) -> &Self {
        self.responses
            .lock()
            .expect("response lock should work")
            .push_back(Err(error));
        self
    }

    /// Requests seen so far, with their full URLs.
    pub fn requests(&self) -> Vec<(String, ApiRequest)> {
        self.requests.lock().expect("request lock should work").clone()
    }
}

impl ApiTransport for ScriptedTransport {
    fn send(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push((url.to_string(), request.clone()));
        self.responses
            .lock()
            .expect("response lock should work")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
    }
}

/// Builds a client against the default local backend.
#[allow(dead_code)]
pub fn client(transport: &Arc<ScriptedTransport>) -> BackendClient {
    BackendClient::new("http://localhost:5000", transport.clone()).expect("client should build")
}
