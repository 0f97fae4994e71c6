mod config;
mod conversation;
mod portfolio;
mod rate_limit;
mod responder;
mod routes;
mod services;
mod speech;
mod state;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, SiteConfig};
use crate::services::contact::{self, ContactError};
use crate::services::github::GitHubClient;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("contact provider: {0}")]
    Contact(#[from] ContactError),
    #[error("github client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "folio failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = SiteConfig::from_env()?;
    let port = config.port;

    // Contact is optional: with no provider the form answers 503.
    let sink = contact::build_sink(config.contact.as_ref(), config.http_timeout)?;
    match &sink {
        Some(sink) => tracing::info!(provider = sink.name(), "contact provider configured"),
        None => tracing::warn!("CONTACT_PROVIDER not set; contact form disabled"),
    }

    let github = GitHubClient::new(&config.github_api_base, &config.github_owner, config.http_timeout)?;
    tracing::info!(owner = github.owner(), "github lookups enabled");

    tracing::info!(website_dir = %config.website_dir.display(), "serving static site");
    let state = state::AppState::new(config, sink, Arc::new(github));

    // Spawn background session expiry.
    let _sweeper = services::sweeper::spawn_session_sweeper(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;

    tracing::info!(%port, "folio listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
