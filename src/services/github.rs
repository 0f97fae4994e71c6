//! GitHub repository stats for project cards.
//!
//! Enrichment is best-effort. A project without a mapped repository, a
//! network failure, a non-2xx answer, or an unparseable body all end the
//! same way: the card renders without stars or a language badge.

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::portfolio::Project;

/// Project title → repository name under the configured owner.
/// An empty name means the project has no public repository.
pub static PROJECT_REPOS: &[(&str, &str)] = &[
    ("Student Gap Analysis", "student-gap-analysis"),
    ("Face Recognition of Partially Occluded Objects", "face-recognition"),
    ("Weather Forecasting", "weather-forecast"),
    ("Diversity Inclusion Dashboard", ""),
    ("Virtual Assistant Chatbot", "virtual-assistant"),
];

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

#[must_use]
pub fn repo_for(title: &str) -> Option<&'static str> {
    PROJECT_REPOS
        .iter()
        .find(|(t, _)| *t == title)
        .map(|(_, repo)| *repo)
        .filter(|repo| !repo.is_empty())
}

/// Repository page URL built from the table, used when the API is unavailable.
#[must_use]
pub fn fallback_url(owner: &str, title: &str) -> Option<String> {
    repo_for(title).map(|repo| format!("https://github.com/{owner}/{repo}"))
}

// =============================================================================
// LOOKUP TRAIT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStats {
    pub stars: u64,
    pub language: Option<String>,
    pub url: String,
}

#[async_trait::async_trait]
pub trait RepoMetadata: Send + Sync {
    /// Stats for the repository behind `title`, or `None` for any reason.
    async fn lookup_stats(&self, title: &str) -> Option<RepoStats>;
}

// =============================================================================
// GITHUB CLIENT
// =============================================================================

#[derive(Deserialize)]
struct RepoResponse {
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    language: Option<String>,
}

pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_base: impl Into<String>, owner: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, api_base: api_base.into(), owner: owner.into() })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn repo_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.owner, repo)
    }
}

#[async_trait::async_trait]
impl RepoMetadata for GitHubClient {
    async fn lookup_stats(&self, title: &str) -> Option<RepoStats> {
        let repo = repo_for(title)?;
        let response = match self
            .http
            .get(self.repo_url(repo))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, %title, "github lookup failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %title, %repo, "github lookup returned non-success");
            return None;
        }

        match response.json::<RepoResponse>().await {
            Ok(body) => Some(RepoStats { stars: body.stargazers_count, language: body.language, url: body.html_url }),
            Err(e) => {
                tracing::warn!(error = %e, %title, "github response parse failed");
                None
            }
        }
    }
}

// =============================================================================
// ENRICHMENT
// =============================================================================

/// A project card as the site renders it.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCard {
    #[serde(flatten)]
    pub project: &'static Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ProjectCard {
    fn plain(project: &'static Project) -> Self {
        Self { project, github: None, stars: None, language: None }
    }
}

/// Attach repository stats to every project, looking them up concurrently.
pub async fn enrich_projects(
    projects: &'static [Project],
    owner: &str,
    lookup: &dyn RepoMetadata,
) -> Vec<ProjectCard> {
    let cards = projects.iter().map(|project| async move {
        let Some(fallback) = fallback_url(owner, project.title) else {
            return ProjectCard::plain(project);
        };
        match lookup.lookup_stats(project.title).await {
            Some(stats) => ProjectCard {
                project,
                github: Some(stats.url),
                stars: Some(stats.stars),
                language: stats.language,
            },
            None => ProjectCard { github: Some(fallback), ..ProjectCard::plain(project) },
        }
    });
    join_all(cards).await
}

#[cfg(test)]
#[path = "github_test.rs"]
mod tests;
