//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON endpoints for the chat widget, the contact form and the project
//! cards live under `/api`. Everything else falls through to the static
//! portfolio site in `WEBSITE_DIR`.

pub mod chat;
pub mod contact;
pub mod site;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Error body for `/api` handler failures, rejected JSON bodies included.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { message: message.into() }))
}

/// Map axum's plain-text body rejection onto the JSON error shape.
pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiError {
    api_error(rejection.status(), rejection.body_text())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/portfolio", get(site::get_portfolio))
        .route("/api/projects", get(site::get_projects))
        .route("/api/chat/respond", post(chat::respond_once))
        .route("/api/chat/sessions", post(chat::create_session))
        .route("/api/chat/sessions/{id}", get(chat::get_session).delete(chat::delete_session))
        .route("/api/chat/sessions/{id}/messages", post(chat::post_message))
        .route("/api/chat/sessions/{id}/toggle", post(chat::toggle))
        .route("/api/chat/sessions/{id}/speech/stop", post(chat::stop_speech))
        .route("/api/contact", post(contact::submit_contact))
        .route("/healthz", get(healthz))
}

/// API routes plus the static site fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website = ServeDir::new(&state.config.website_dir).append_index_html_on_directories(true);

    api_routes()
        .fallback_service(website)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
