//! Scripted stand-in for the Anthropic, `OpenAI` and Gemini endpoints

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Request captured by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    /// Key from `x-api-key`, bearer auth or the `key` query parameter
    pub credential: Option<String>,
    pub body: Value,
}

struct VendorState {
    replies: Mutex<VecDeque<Value>>,
    fail_count: AtomicU32,
    fail_status: StatusCode,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock vendor that answers with scripted bodies in order
pub struct MockVendor {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<VendorState>,
}

impl MockVendor {
    pub async fn start(replies: impl IntoIterator<Item = Value>) -> anyhow::Result<Self> {
        Self::start_failing(0, StatusCode::OK, replies).await
    }

    /// Answer the first `fail_count` requests with `fail_status`, then replay `replies`
    pub async fn start_failing(
        fail_count: u32,
        fail_status: StatusCode,
        replies: impl IntoIterator<Item = Value>,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(VendorState {
            replies: Mutex::new(replies.into_iter().collect()),
            fail_count: AtomicU32::new(fail_count),
            fail_status,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/messages", post(handle))
            .route("/v1/responses", post(handle))
            .route("/v1beta/models/{model_action}", post(handle))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for the Anthropic and `OpenAI` adapters
    pub fn v1_url(&self) -> Url {
        Url::parse(&format!("http://{}/v1", self.addr)).unwrap()
    }

    /// Base URL for the Gemini adapter
    pub fn v1beta_url(&self) -> Url {
        Url::parse(&format!("http://{}/v1beta", self.addr)).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Body of the `index`th request
    pub fn body(&self, index: usize) -> Value {
        self.requests()[index].body.clone()
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle(
    State(state): State<Arc<VendorState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_owned(),
        credential: credential(&headers, &uri),
        body,
    });

    if state
        .fail_count
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        let body = json!({"error": {"type": "mock_error", "message": "scripted failure"}});
        return (state.fail_status, Json(body)).into_response();
    }

    let reply = state.replies.lock().unwrap().pop_front();
    match reply {
        Some(reply) => Json(reply).into_response(),
        None => {
            let body = json!({"error": {"type": "mock_error", "message": "no scripted reply left"}});
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

fn credential(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(key) = headers.get("x-api-key") {
        return key.to_str().ok().map(str::to_owned);
    }
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        return auth
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned);
    }
    uri.query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("key="))
        .map(str::to_owned)
}
