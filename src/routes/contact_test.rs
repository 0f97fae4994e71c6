use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::HeaderValue;

use super::*;
use crate::config::{ContactRateConfig, SiteConfig};
use crate::services::contact::{ContactSink, ValidContact};
use crate::state::test_helpers;

// =========================================================================
// MockSink
// =========================================================================

struct MockSink {
    fail: bool,
    received: Mutex<Vec<ValidContact>>,
}

impl MockSink {
    fn ok() -> Arc<Self> {
        Arc::new(Self { fail: false, received: Mutex::new(Vec::new()) })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, received: Mutex::new(Vec::new()) })
    }

    fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ContactSink for MockSink {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn submit(&self, contact: &ValidContact) -> Result<Ack, ContactError> {
        self.received.lock().unwrap().push(contact.clone());
        if self.fail {
            return Err(ContactError::Transport("connection refused".into()));
        }
        Ok(Ack { message: "Thanks, I'll be in touch.".into() })
    }
}

fn state_with(sink: Option<Arc<MockSink>>, per_client_limit: usize, trust_proxy_headers: bool) -> AppState {
    let config = SiteConfig {
        contact_rate: ContactRateConfig { per_client_limit, global_limit: 100, window: Duration::from_secs(600) },
        trust_proxy_headers,
        ..SiteConfig::default()
    };
    let sink = sink.map(|s| s as Arc<dyn ContactSink>);
    test_helpers::test_app_state_with(config, sink, Arc::new(test_helpers::NoRepos))
}

fn peer(last: u8) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from((Ipv4Addr::new(192, 0, 2, last), 40000)))
}

fn form() -> ContactForm {
    ContactForm {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        subject: "Internship".into(),
        message: "Are you open to a chat?".into(),
    }
}

async fn submit(state: &AppState, from: u8, headers: HeaderMap, body: ContactForm) -> Result<Json<Ack>, ApiError> {
    submit_contact(State(state.clone()), peer(from), headers, Ok(Json(body))).await
}

// =========================================================================
// submit_contact
// =========================================================================

#[tokio::test]
async fn valid_form_is_relayed() {
    let sink = MockSink::ok();
    let state = state_with(Some(sink.clone()), 5, false);

    let Json(ack) = submit(&state, 1, HeaderMap::new(), form()).await.unwrap();
    assert_eq!(ack.message, "Thanks, I'll be in touch.");
    assert_eq!(sink.count(), 1);
    assert_eq!(sink.received.lock().unwrap()[0].subject, "Internship");
}

#[tokio::test]
async fn invalid_form_is_400_and_never_relayed() {
    let sink = MockSink::ok();
    let state = state_with(Some(sink.clone()), 5, false);

    let mut bad = form();
    bad.email = "not-an-email".into();
    let (status, Json(body)) = submit(&state, 1, HeaderMap::new(), bad).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.message, "invalid email address");

    let mut blank = form();
    blank.message = "   ".into();
    let (status, Json(body)) = submit(&state, 1, HeaderMap::new(), blank).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.message, "message is required");

    assert_eq!(sink.count(), 0);
}

#[tokio::test]
async fn invalid_form_does_not_spend_rate_limit() {
    let sink = MockSink::ok();
    let state = state_with(Some(sink.clone()), 1, false);

    let mut bad = form();
    bad.name = String::new();
    submit(&state, 1, HeaderMap::new(), bad).await.unwrap_err();

    assert!(submit(&state, 1, HeaderMap::new(), form()).await.is_ok());
}

#[tokio::test]
async fn missing_provider_is_503() {
    let state = state_with(None, 5, false);
    let (status, _) = submit(&state, 1, HeaderMap::new(), form()).await.unwrap_err();
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn relay_failure_is_502_with_generic_message() {
    let sink = MockSink::failing();
    let state = state_with(Some(sink.clone()), 5, false);

    let (status, Json(body)) = submit(&state, 1, HeaderMap::new(), form()).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.message, "Failed to send message");
    assert_eq!(sink.count(), 1);
}

#[tokio::test]
async fn per_client_limit_is_429() {
    let sink = MockSink::ok();
    let state = state_with(Some(sink.clone()), 2, false);

    submit(&state, 1, HeaderMap::new(), form()).await.unwrap();
    submit(&state, 1, HeaderMap::new(), form()).await.unwrap();
    let (status, _) = submit(&state, 1, HeaderMap::new(), form()).await.unwrap_err();
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // A different address still gets through.
    assert!(submit(&state, 2, HeaderMap::new(), form()).await.is_ok());
    assert_eq!(sink.count(), 3);
}

#[tokio::test]
async fn forwarded_for_keys_the_limiter_when_trusted() {
    let sink = MockSink::ok();
    let state = state_with(Some(sink), 1, true);

    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
    submit(&state, 1, headers, form()).await.unwrap();

    // Same proxy peer, different original client.
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.8"));
    assert!(submit(&state, 1, headers, form()).await.is_ok());
}

// =========================================================================
// client_ip
// =========================================================================

#[test]
fn client_ip_ignores_forwarded_for_unless_trusted() {
    let addr = SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 40000));
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

    assert_eq!(client_ip(&headers, addr, false), addr.ip());
    assert_eq!(client_ip(&headers, addr, true), "203.0.113.7".parse::<IpAddr>().unwrap());
}

#[test]
fn client_ip_falls_back_on_garbage_header() {
    let addr = SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 40000));
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
    assert_eq!(client_ip(&headers, addr, true), addr.ip());
}

#[test]
fn rate_limit_errors_are_429() {
    let (status, Json(body)) =
        rate_limit_error_to_status(RateLimitError::GlobalExceeded { limit: 50, window_secs: 600 });
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body.message.contains("50"));
}
