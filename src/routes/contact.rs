//! Contact form route.
//!
//! DESIGN
//! ======
//! Order matters: validation first, so a bad form never costs the visitor a
//! rate-limit slot and never reaches the provider. Only forms that will be
//! relayed are counted against the limiter.

use std::net::{IpAddr, SocketAddr};

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use tracing::{info, warn};

use super::{ApiError, api_error, json_rejection};
use crate::rate_limit::RateLimitError;
use crate::services::contact::{Ack, ContactError, ContactForm};
use crate::state::AppState;

/// `POST /api/contact`: relay a valid form to the configured provider.
pub async fn submit_contact(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    form: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let Json(form) = form.map_err(json_rejection)?;
    let contact = form.validate().map_err(contact_error_to_status)?;

    let Some(sink) = state.contact.as_ref() else {
        warn!("contact submission with no provider configured");
        return Err(api_error(StatusCode::SERVICE_UNAVAILABLE, "The contact form is not available right now."));
    };

    let client = client_ip(&headers, peer, state.config.trust_proxy_headers);
    state
        .rate_limiter
        .check_and_record(client)
        .map_err(rate_limit_error_to_status)?;

    match sink.submit(&contact).await {
        Ok(ack) => {
            info!(provider = sink.name(), %client, "contact message relayed");
            Ok(Json(ack))
        }
        Err(e) => {
            warn!(provider = sink.name(), %client, error = %e, "contact relay failed");
            Err(contact_error_to_status(e))
        }
    }
}

/// Address the limiter keys on. The first `X-Forwarded-For` hop is used
/// only when the server is told it sits behind a proxy.
pub(crate) fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_proxy_headers: bool) -> IpAddr {
    if trust_proxy_headers {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    peer.ip()
}

pub(crate) fn contact_error_to_status(err: ContactError) -> ApiError {
    let status = if err.is_validation() { StatusCode::BAD_REQUEST } else { StatusCode::BAD_GATEWAY };
    api_error(status, err.visitor_message())
}

pub(crate) fn rate_limit_error_to_status(err: RateLimitError) -> ApiError {
    api_error(StatusCode::TOO_MANY_REQUESTS, err.to_string())
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
