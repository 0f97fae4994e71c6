//! Portfolio content routes.

use axum::extract::State;
use axum::response::Json;

use crate::portfolio::{self, PROJECTS, Portfolio};
use crate::services::github::{self, ProjectCard};
use crate::state::AppState;

/// `GET /api/portfolio`: everything the page renders, minus live repo stats.
pub async fn get_portfolio() -> Json<Portfolio> {
    Json(portfolio::portfolio())
}

/// `GET /api/projects`: project cards with GitHub stars and language.
///
/// Lookups that fail degrade to the plain repository link; this route never
/// errors.
pub async fn get_projects(State(state): State<AppState>) -> Json<Vec<ProjectCard>> {
    Json(github::enrich_projects(PROJECTS, &state.config.github_owner, state.repos.as_ref()).await)
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
