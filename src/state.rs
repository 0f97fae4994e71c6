//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the parsed config, the live chat sessions, and the two outbound
//! collaborators (contact sink, repository lookup). Each chat session owns
//! its own `Conversation`; nothing is shared between sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::conversation::Conversation;
use crate::rate_limit::RateLimiter;
use crate::services::contact::ContactSink;
use crate::services::github::RepoMetadata;

/// Live chat sessions keyed by session id.
pub type Sessions = Arc<RwLock<HashMap<Uuid, Conversation>>>;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub sessions: Sessions,
    /// Contact provider. `None` if no provider is configured.
    pub contact: Option<Arc<dyn ContactSink>>,
    pub repos: Arc<dyn RepoMetadata>,
    /// In-memory rate limiter for contact submissions.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(config: SiteConfig, contact: Option<Arc<dyn ContactSink>>, repos: Arc<dyn RepoMetadata>) -> Self {
        let rate_limiter = RateLimiter::new(config.contact_rate);
        Self { config: Arc::new(config), sessions: Arc::new(RwLock::new(HashMap::new())), contact, repos, rate_limiter }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
