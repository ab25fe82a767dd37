use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU16, Ordering},
        Arc, RwLock as StdRwLock,
    },
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// One request as the mock saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Customer {
    pub attributes: Map<String, Value>,
    pub events: Vec<String>,
}

#[derive(Deserialize)]
pub struct EventInput {
    pub name: String,
}

/// Shared state behind the router. Cloning shares the same log and store.
#[derive(Clone, Default)]
pub struct MockState {
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    customers: Arc<RwLock<HashMap<String, Customer>>>,
    forced_status: Arc<AtomicU16>,
    forced_location: Arc<StdRwLock<Option<String>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every subsequent request with `status`, skipping the store.
    pub fn force_status(&self, status: u16) {
        self.forced_status.store(status, Ordering::SeqCst);
    }

    /// Answer every subsequent request with a redirect to `location`.
    pub fn force_redirect(&self, status: u16, location: &str) {
        if let Ok(mut forced) = self.forced_location.write() {
            *forced = Some(location.to_string());
        }
        self.force_status(status);
    }

    pub fn clear_forced_status(&self) {
        if let Ok(mut forced) = self.forced_location.write() {
            *forced = None;
        }
        self.forced_status.store(0, Ordering::SeqCst);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn customer(&self, id: &str) -> Option<Customer> {
        self.customers.read().await.get(id).cloned()
    }

    async fn record(&self, method: Method, path: String, headers: &HeaderMap, body: Option<Value>) {
        let text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        tracing::debug!(%method, %path, "recorded request");
        self.requests.write().await.push(RecordedRequest {
            method: method.to_string(),
            path,
            authorization: text(header::AUTHORIZATION),
            content_type: text(header::CONTENT_TYPE),
            body,
        });
    }

    /// Reply to send before touching the store, if any.
    fn short_circuit(&self, headers: &HeaderMap) -> Option<Reply> {
        let forced = self.forced_status.load(Ordering::SeqCst);
        if forced != 0 {
            let status = StatusCode::from_u16(forced).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut reply_headers = HeaderMap::new();
            let location = self.forced_location.read().ok().and_then(|l| l.clone());
            if let Some(value) = location.and_then(|l| HeaderValue::from_str(&l).ok()) {
                reply_headers.insert(header::LOCATION, value);
            }
            return Some((status, reply_headers, empty_body()));
        }
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| !v.trim().is_empty());
        (!authorized).then(|| reply(StatusCode::UNAUTHORIZED))
    }
}

type Reply = (StatusCode, HeaderMap, Json<Value>);

fn empty_body() -> Json<Value> {
    Json(Value::Object(Map::new()))
}

fn reply(status: StatusCode) -> Reply {
    (status, HeaderMap::new(), empty_body())
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/api/v1/customers/{id}", put(update_customer).delete(delete_customer))
        .route("/api/v1/customers/{id}/events", post(create_event))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn update_customer(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(attributes): Json<Map<String, Value>>,
) -> Reply {
    let path = format!("/api/v1/customers/{id}");
    state
        .record(Method::PUT, path, &headers, Some(Value::Object(attributes.clone())))
        .await;
    if let Some(early) = state.short_circuit(&headers) {
        return early;
    }

    let mut customers = state.customers.write().await;
    let customer = customers.entry(id).or_default();
    customer.attributes.extend(attributes);
    reply(StatusCode::OK)
}

async fn delete_customer(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let path = format!("/api/v1/customers/{id}");
    state.record(Method::DELETE, path, &headers, None).await;
    if let Some(early) = state.short_circuit(&headers) {
        return early;
    }

    state.customers.write().await.remove(&id);
    reply(StatusCode::OK)
}

async fn create_event(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let path = format!("/api/v1/customers/{id}/events");
    state.record(Method::POST, path, &headers, Some(body.clone())).await;
    if let Some(early) = state.short_circuit(&headers) {
        return early;
    }

    let Ok(event) = serde_json::from_value::<EventInput>(body) else {
        return reply(StatusCode::BAD_REQUEST);
    };
    state
        .customers
        .write()
        .await
        .entry(id)
        .or_default()
        .events
        .push(event.name);
    reply(StatusCode::OK)
}
