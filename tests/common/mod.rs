//! In-process HTTP server for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, State};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri, header};
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use ticket_desk::api::ApiClient;
use ticket_desk::config::ApiConfig;
use ticket_desk::i18n::Locale;

/// A request as the server saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// One part of a `multipart/form-data` body
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Failed to parse request body")
    }

    /// Parse the recorded body as `multipart/form-data`
    pub async fn form_parts(&self) -> Vec<FormPart> {
        let content_type = self
            .header("content-type")
            .expect("Multipart request without content type");
        let request = Request::builder()
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(self.body.clone()))
            .expect("Failed to rebuild request");
        let mut multipart = Multipart::from_request(request, &())
            .await
            .expect("Failed to read multipart body");

        let mut parts = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .expect("Malformed multipart field")
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.expect("Failed to read multipart field");
            parts.push(FormPart {
                name,
                file_name,
                content_type,
                data,
            });
        }
        parts
    }
}

type Route = Arc<dyn Fn(&Recorded) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    route: Route,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Answers every request through `route` and records it
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub async fn start<F>(route: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            route: Arc::new(route),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn client(&self) -> ApiClient {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            timeout_ms: 5_000,
        };
        ApiClient::new(&config, Locale::En).expect("Failed to build client")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// The single request matching `method` and `path`
    pub fn only(&self, method: &str, path: &str) -> Recorded {
        let mut matching: Vec<Recorded> = self
            .requests()
            .into_iter()
            .filter(|r| r.method == method && r.path() == path)
            .collect();
        assert_eq!(matching.len(), 1, "expected one {method} {path}");
        matching.remove(0)
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = Recorded {
        method,
        uri,
        headers,
        body,
    };
    let (status, payload) = (state.route)(&request);
    state
        .requests
        .lock()
        .expect("request log poisoned")
        .push(request);

    let status = StatusCode::from_u16(status).expect("Invalid status in test route");
    (status, [(header::CONTENT_TYPE, "application/json")], payload)
}

/// Unsigned JWT-shaped token expiring at `exp`
pub fn make_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

pub fn ticket_json(id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "author": { "id": 1, "name": "Ann" },
        "status": "open",
        "created_at": "2024-05-01T10:00:00Z",
    })
}
