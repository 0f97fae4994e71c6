//! Site configuration parsed from environment variables.
//!
//! Every knob has a default except the contact provider, which is optional:
//! with no provider configured the contact route answers 503 and the rest of
//! the site keeps working.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBSITE_DIR: &str = "website";
pub const DEFAULT_GITHUB_OWNER: &str = "bhadurishayoun";
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;
pub const DEFAULT_CONTACT_RATE_LIMIT: usize = 5;
pub const DEFAULT_CONTACT_RATE_WINDOW_SECS: u64 = 600;
pub const DEFAULT_CONTACT_GLOBAL_LIMIT: usize = 50;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} is required when CONTACT_PROVIDER={provider}")]
    Missing { var: &'static str, provider: &'static str },
}

/// Where contact form submissions go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactProviderConfig {
    /// POST the form as JSON to an HTTP endpoint (FormSubmit, a serverless function, ...).
    Webhook { endpoint: String },
    /// Send through the Resend API.
    Resend { api_key: String, from: String, to: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactRateConfig {
    pub per_client_limit: usize,
    pub global_limit: usize,
    pub window: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub port: u16,
    pub website_dir: PathBuf,
    pub github_owner: String,
    pub github_api_base: String,
    pub http_timeout: Duration,
    pub session_idle: Duration,
    pub sweep_interval: Duration,
    /// Live chat sessions allowed at once; creation past this answers 503.
    pub max_sessions: usize,
    /// How long a session shows the assistant as typing before the reply lands.
    pub reply_delay: Duration,
    pub contact: Option<ContactProviderConfig>,
    pub contact_rate: ContactRateConfig,
    /// Take the client address from `X-Forwarded-For` (set behind a reverse proxy).
    pub trust_proxy_headers: bool,
}

impl SiteConfig {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` does not parse, if `CONTACT_PROVIDER` names
    /// an unknown provider, or if the chosen provider lacks a required var.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Used by tests.
    pub(crate) fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let website_dir = get("WEBSITE_DIR").map_or_else(|| PathBuf::from(DEFAULT_WEBSITE_DIR), PathBuf::from);
        let github_owner = get("GITHUB_OWNER").unwrap_or_else(|| DEFAULT_GITHUB_OWNER.to_owned());
        let github_api_base = get("GITHUB_API_BASE")
            .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let secs = |key: &str, default: u64| Duration::from_secs(parse_or(get(key), default));

        Ok(Self {
            port,
            website_dir,
            github_owner,
            github_api_base,
            http_timeout: secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            session_idle: secs("CHAT_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS),
            sweep_interval: secs("CHAT_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS),
            max_sessions: parse_or(get("CHAT_MAX_SESSIONS"), DEFAULT_MAX_SESSIONS),
            reply_delay: Duration::from_millis(parse_or(get("CHAT_REPLY_DELAY_MS"), DEFAULT_REPLY_DELAY_MS)),
            contact: parse_contact_provider(&get)?,
            contact_rate: ContactRateConfig {
                per_client_limit: parse_or(get("CONTACT_RATE_LIMIT"), DEFAULT_CONTACT_RATE_LIMIT),
                global_limit: parse_or(get("CONTACT_GLOBAL_LIMIT"), DEFAULT_CONTACT_GLOBAL_LIMIT),
                window: secs("CONTACT_RATE_WINDOW_SECS", DEFAULT_CONTACT_RATE_WINDOW_SECS),
            },
            trust_proxy_headers: get("TRUST_PROXY_HEADERS")
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(false),
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            website_dir: PathBuf::from(DEFAULT_WEBSITE_DIR),
            github_owner: DEFAULT_GITHUB_OWNER.to_owned(),
            github_api_base: DEFAULT_GITHUB_API_BASE.to_owned(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            contact: None,
            contact_rate: ContactRateConfig {
                per_client_limit: DEFAULT_CONTACT_RATE_LIMIT,
                global_limit: DEFAULT_CONTACT_GLOBAL_LIMIT,
                window: Duration::from_secs(DEFAULT_CONTACT_RATE_WINDOW_SECS),
            },
            trust_proxy_headers: false,
        }
    }
}

/// Parse `raw`, falling back to `default` when absent or malformed.
pub(crate) fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_contact_provider<F>(get: &F) -> Result<Option<ContactProviderConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get("CONTACT_PROVIDER") else {
        return Ok(None);
    };
    let require = |var: &'static str, provider: &'static str| {
        get(var)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing { var, provider })
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "none" => Ok(None),
        "webhook" => Ok(Some(ContactProviderConfig::Webhook { endpoint: require("CONTACT_ENDPOINT", "webhook")? })),
        "resend" => Ok(Some(ContactProviderConfig::Resend {
            api_key: require("RESEND_API_KEY", "resend")?,
            from: require("RESEND_FROM", "resend")?,
            to: require("CONTACT_TO", "resend")?,
        })),
        _ => Err(ConfigError::Invalid { var: "CONTACT_PROVIDER", value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
