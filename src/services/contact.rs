//! Contact form bridge: validation plus hand-off to an email provider.
//!
//! ARCHITECTURE
//! ============
//! The route validates first and only then calls a `ContactSink`. Which sink
//! is behind the trait is deployment configuration: a webhook relay that
//! POSTs the form as JSON, or Resend. There is no retry and no queue; a
//! failed hand-off is reported once.

use std::sync::Arc;
use std::time::Duration;

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use serde::{Deserialize, Serialize};

use crate::config::ContactProviderConfig;

const CONTACT_EMAIL_TEMPLATE: &str = include_str!("../../templates/contact_email.html");
const DEFAULT_SUCCESS_MESSAGE: &str = "Message sent successfully!";
const DEFAULT_FAILURE_MESSAGE: &str = "Failed to send message";

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email address")]
    InvalidEmail,
    #[error("contact relay unreachable: {0}")]
    Transport(String),
    #[error("contact relay rejected the message (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("email delivery failed: {0}")]
    Delivery(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ContactError {
    /// Whether the error is the submitter's fault and safe to show verbatim.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::InvalidEmail)
    }

    /// Text safe to show the visitor. Provider internals stay in the logs.
    #[must_use]
    pub fn visitor_message(&self) -> String {
        match self {
            Self::MissingField(_) | Self::InvalidEmail => self.to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(_) | Self::Delivery(_) | Self::HttpClientBuild(_) => DEFAULT_FAILURE_MESSAGE.to_owned(),
        }
    }
}

// =============================================================================
// FORM + VALIDATION
// =============================================================================

/// Raw form fields as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A form that passed validation. Fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Check required fields and email shape.
    ///
    /// # Errors
    ///
    /// `MissingField` for the first blank field (in form order), then
    /// `InvalidEmail` if the address is malformed.
    pub fn validate(&self) -> Result<ValidContact, ContactError> {
        let required = |value: &str, field: &'static str| {
            let trimmed = value.trim();
            if trimmed.is_empty() { Err(ContactError::MissingField(field)) } else { Ok(trimmed.to_owned()) }
        };

        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        let subject = required(&self.subject, "subject")?;
        let message = required(&self.message, "message")?;

        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(ValidContact { name, email, subject, message })
    }
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// inside the domain with something on both sides.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

// =============================================================================
// SINK TRAIT
// =============================================================================

/// Provider acknowledgement, shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub message: String,
}

#[async_trait::async_trait]
pub trait ContactSink: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    async fn submit(&self, contact: &ValidContact) -> Result<Ack, ContactError>;
}

/// Build the configured sink, or `None` when contact is disabled.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_sink(
    config: Option<&ContactProviderConfig>,
    timeout: Duration,
) -> Result<Option<Arc<dyn ContactSink>>, ContactError> {
    let Some(config) = config else {
        return Ok(None);
    };
    let sink: Arc<dyn ContactSink> = match config {
        ContactProviderConfig::Webhook { endpoint } => Arc::new(WebhookRelay::new(endpoint.clone(), timeout)?),
        ContactProviderConfig::Resend { api_key, from, to } => {
            Arc::new(ResendRelay::new(api_key, from.clone(), to.clone()))
        }
    };
    Ok(Some(sink))
}

// =============================================================================
// WEBHOOK RELAY
// =============================================================================

/// Wire body for form relays. The underscored hints are understood by
/// FormSubmit-style services and ignored by plain endpoints.
#[derive(Serialize)]
struct WebhookBody<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    #[serde(rename = "_subject")]
    mail_subject: String,
    #[serde(rename = "_replyto")]
    reply_to: &'a str,
}

#[derive(Deserialize)]
struct RelayResponse {
    #[serde(default)]
    message: Option<String>,
}

pub struct WebhookRelay {
    http: reqwest::Client,
    endpoint: String,
}

impl WebhookRelay {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ContactError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContactError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait::async_trait]
impl ContactSink for WebhookRelay {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn submit(&self, contact: &ValidContact) -> Result<Ack, ContactError> {
        let body = WebhookBody {
            name: &contact.name,
            email: &contact.email,
            subject: &contact.subject,
            message: &contact.message,
            mail_subject: mail_subject(&contact.subject),
            reply_to: &contact.email,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ContactError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ContactError::Transport(e.to_string()))?;
        let relay_message = relay_message(&text);

        if !status.is_success() {
            return Err(ContactError::Rejected {
                status: status.as_u16(),
                message: relay_message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_owned()),
            });
        }
        Ok(Ack { message: relay_message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_owned()) })
    }
}

/// Pull `message` out of a relay's JSON body, if it has one.
fn relay_message(body: &str) -> Option<String> {
    serde_json::from_str::<RelayResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .filter(|m| !m.trim().is_empty())
}

// =============================================================================
// RESEND RELAY
// =============================================================================

pub struct ResendRelay {
    resend: Resend,
    from: String,
    to: String,
}

impl ResendRelay {
    #[must_use]
    pub fn new(api_key: &str, from: String, to: String) -> Self {
        Self { resend: Resend::new(api_key), from, to }
    }
}

#[async_trait::async_trait]
impl ContactSink for ResendRelay {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn submit(&self, contact: &ValidContact) -> Result<Ack, ContactError> {
        let to = [self.to.as_str()];
        let subject = mail_subject(&contact.subject);
        let html = render_contact_template(contact);

        let email = CreateEmailBaseOptions::new(&self.from, to, &subject)
            .with_html(&html)
            .with_reply(&contact.email);
        self.resend
            .emails
            .send(email)
            .await
            .map_err(|e| ContactError::Delivery(e.to_string()))?;
        Ok(Ack { message: DEFAULT_SUCCESS_MESSAGE.to_owned() })
    }
}

fn mail_subject(subject: &str) -> String {
    format!("New Contact Form Submission: {subject}")
}

/// Fill the notification template. Values are HTML-escaped and message
/// newlines become `<br>`.
#[must_use]
pub fn render_contact_template(contact: &ValidContact) -> String {
    fill_template(CONTACT_EMAIL_TEMPLATE, |key| match key {
        "NAME" => Some(escape_html(&contact.name)),
        "EMAIL" => Some(escape_html(&contact.email)),
        "SUBJECT" => Some(escape_html(&contact.subject)),
        "MESSAGE" => Some(escape_html(&contact.message).replace('\n', "<br>")),
        _ => None,
    })
}

/// Replace `{{KEY}}` tokens in one left-to-right pass. Substituted values are
/// never rescanned; unknown keys and unclosed braces are copied through.
fn fill_template<F>(template: &str, value: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        match value(&after[..close]) {
            Some(v) => out.push_str(&v),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
