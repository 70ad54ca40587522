use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use fitcoach_api::{
    app,
    config::SchedulingConfig,
    middleware::auth::{TIMEZONE_HEADER, USER_ID_HEADER, USER_ROLE_HEADER},
    ApiState,
};
use fitcoach_core::models::session::UserRole;
use fitcoach_db::{DraftStore, EventStore, InMemoryDraftStore, InMemoryEventStore};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Who a test request is sent as.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Caller {
    pub fn coach() -> Self {
        Self { user_id: Uuid::new_v4(), role: UserRole::Coach }
    }

    pub fn client() -> Self {
        Self { user_id: Uuid::new_v4(), role: UserRole::Client }
    }
}

pub struct TestContext {
    pub events: Arc<InMemoryEventStore>,
    pub drafts: Arc<InMemoryDraftStore>,
    app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_scheduling(SchedulingConfig::default())
    }

    pub fn with_scheduling(scheduling: SchedulingConfig) -> Self {
        let events = Arc::new(InMemoryEventStore::new());
        let drafts = Arc::new(InMemoryDraftStore::new());
        let app = build_app(events.clone(), drafts.clone(), scheduling);
        Self { events, drafts, app }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<Caller>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.app, method, uri, caller, None, body).await
    }

    pub async fn send_in_zone(
        &self,
        method: Method,
        uri: &str,
        caller: Caller,
        timezone: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.app, method, uri, Some(caller), Some(timezone), body).await
    }
}

pub fn build_app(
    events: Arc<dyn EventStore>,
    drafts: Arc<dyn DraftStore>,
    scheduling: SchedulingConfig,
) -> Router {
    app(Arc::new(ApiState {
        events,
        drafts,
        scheduling,
    }))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    caller: Option<Caller>,
    timezone: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        request = request
            .header(USER_ID_HEADER, caller.user_id.to_string())
            .header(USER_ROLE_HEADER, caller.role.to_string());
    }
    if let Some(timezone) = timezone {
        request = request.header(TIMEZONE_HEADER, timezone);
    }

    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
