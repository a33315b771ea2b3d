#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pantry_core::toast::ToastChannel;
use pantry_core::transport::{
    ApiError, ApiRequest, ApiTransport, Method, TransportFuture, TransportResult,
};
use serde_json::{Value, json};

struct Scripted {
    result: TransportResult<Value>,
    delay: Option<Duration>,
}

/// In-process transport that answers each `(method, path)` from a queue of
/// canned responses and records every request it was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.push(method, path, Ok(body), None);
    }

    pub fn respond_after(&self, method: Method, path: &str, delay: Duration, body: Value) {
        self.push(method, path, Ok(body), Some(delay));
    }

    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Err(error), None);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(
        &self,
        method: Method,
        path: &str,
        result: TransportResult<Value>,
        delay: Option<Duration>,
    ) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Scripted { result, delay });
    }
}

impl ApiTransport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        let scripted = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front);
        let route = format!("{} {}", request.method.as_str(), request.path);
        self.requests.lock().unwrap().push(request);

        Box::pin(async move {
            let Some(scripted) = scripted else {
                return Err(ApiError::Network(format!("no scripted response for {route}")));
            };
            if let Some(delay) = scripted.delay {
                tokio::time::sleep(delay).await;
            }
            scripted.result
        })
    }
}

pub fn toasts() -> Arc<ToastChannel> {
    Arc::new(ToastChannel::default())
}

pub fn recipe_json(id: i64, is_liked: bool, like_count: u64) -> Value {
    json!({
        "id": id,
        "title": format!("Recipe {id}"),
        "likeCount": like_count,
        "isLiked": is_liked,
        "isSaved": false,
    })
}

pub fn recipe_list(recipes: Vec<Value>, total: u64) -> Value {
    json!({
        "success": true,
        "recipes": recipes,
        "pagination": {"total": total, "page": 1, "limit": 12},
    })
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}
