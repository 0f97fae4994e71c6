//! Conversation controller for one chat widget session.
//!
//! DESIGN
//! ======
//! A `Conversation` owns the transcript and the widget flags. The transcript
//! is append-only. A turn pushes the user message, then the bot reply, so
//! insertion order is display order. Between the two the turn is pending:
//! `awaiting_reply` reads true and a second turn is refused, which keeps
//! every reply directly after its question. Nothing ever removes or edits a
//! message; the whole conversation is dropped when the session ends, and a
//! transcript stops accepting turns at `MAX_TRANSCRIPT_MESSAGES`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::responder::{self, Action};
use crate::speech::{InputSource, Narrator, SpeechCapabilities, Utterance};

/// Longest message accepted from the widget, in characters.
pub const MAX_INPUT_CHARS: usize = 2000;

/// Most messages one transcript may hold: the greeting plus 100 turns.
pub const MAX_TRANSCRIPT_MESSAGES: usize = 201;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("message is empty")]
    EmptyInput,
    #[error("message exceeds {max} characters")]
    InputTooLong { max: usize },
    #[error("conversation is full ({max} messages); start a new chat")]
    TranscriptFull { max: usize },
    #[error("still answering the previous message")]
    ReplyPending,
}

/// Reject blank or oversized chat input.
///
/// # Errors
///
/// `EmptyInput` for whitespace-only text, `InputTooLong` past
/// [`MAX_INPUT_CHARS`].
pub fn check_input(input: &str) -> Result<(), ConversationError> {
    if input.trim().is_empty() {
        return Err(ConversationError::EmptyInput);
    }
    if input.chars().count() > MAX_INPUT_CHARS {
        return Err(ConversationError::InputTooLong { max: MAX_INPUT_CHARS });
    }
    Ok(())
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    /// Set on user messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<InputSource>,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
}

impl ChatMessage {
    fn bot(text: impl Into<String>, sent_at: OffsetDateTime) -> Self {
        Self { id: Uuid::new_v4(), text: text.into(), sender: Sender::Bot, source: None, sent_at }
    }

    fn user(text: impl Into<String>, source: InputSource, sent_at: OffsetDateTime) -> Self {
        Self { id: Uuid::new_v4(), text: text.into(), sender: Sender::User, source: Some(source), sent_at }
    }
}

/// Result of one user submission.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub user: ChatMessage,
    pub reply: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterance: Option<Utterance>,
}

// =============================================================================
// CONVERSATION
// =============================================================================

#[derive(Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    open: bool,
    /// The user message whose reply has not been appended yet.
    pending: Option<ChatMessage>,
    capabilities: SpeechCapabilities,
    narrator: Option<Narrator>,
    last_active: Instant,
}

impl Conversation {
    /// Start a session with the seeded greeting.
    #[must_use]
    pub fn new(capabilities: SpeechCapabilities) -> Self {
        Self::new_at(capabilities, Instant::now())
    }

    pub(crate) fn new_at(capabilities: SpeechCapabilities, now: Instant) -> Self {
        Self {
            messages: vec![ChatMessage::bot(responder::GREETING, OffsetDateTime::now_utc())],
            open: false,
            pending: None,
            capabilities,
            narrator: capabilities.narrator(),
            last_active: now,
        }
    }

    /// Append the user's message and the bot's reply.
    ///
    /// # Errors
    ///
    /// Rejects blank or oversized input, a full transcript, or a turn started
    /// while another is pending, all without touching the transcript.
    pub fn submit(&mut self, input: &str, source: InputSource) -> Result<Turn, ConversationError> {
        self.submit_at(input, source, Instant::now())
    }

    pub(crate) fn submit_at(
        &mut self,
        input: &str,
        source: InputSource,
        now: Instant,
    ) -> Result<Turn, ConversationError> {
        let user = self.begin_turn_at(input, source, now)?;
        self.pending = None;
        Ok(self.reply_to(user))
    }

    /// Append the user's message and mark the reply as pending. The reply
    /// lands on [`Conversation::complete_turn`].
    ///
    /// # Errors
    ///
    /// Same as [`Conversation::submit`].
    pub fn begin_turn(&mut self, input: &str, source: InputSource) -> Result<ChatMessage, ConversationError> {
        self.begin_turn_at(input, source, Instant::now())
    }

    pub(crate) fn begin_turn_at(
        &mut self,
        input: &str,
        source: InputSource,
        now: Instant,
    ) -> Result<ChatMessage, ConversationError> {
        check_input(input)?;
        if self.pending.is_some() {
            return Err(ConversationError::ReplyPending);
        }
        if self.messages.len() + 2 > MAX_TRANSCRIPT_MESSAGES {
            return Err(ConversationError::TranscriptFull { max: MAX_TRANSCRIPT_MESSAGES });
        }

        let source = if source == InputSource::Voice && !self.capabilities.recognition {
            tracing::debug!("voice input without recognition capability; recording as text");
            InputSource::Text
        } else {
            source
        };

        self.last_active = now;
        let user = ChatMessage::user(input, source, OffsetDateTime::now_utc());
        self.messages.push(user.clone());
        self.pending = Some(user.clone());
        Ok(user)
    }

    /// Append the reply to the pending user message. `None` if no turn is pending.
    pub fn complete_turn(&mut self) -> Option<Turn> {
        let user = self.pending.take()?;
        Some(self.reply_to(user))
    }

    fn reply_to(&mut self, user: ChatMessage) -> Turn {
        let answer = responder::respond(&user.text);
        // Wall clocks can step backwards; keep transcript timestamps monotone.
        let sent_at = OffsetDateTime::now_utc().max(user.sent_at);
        let reply = ChatMessage::bot(answer.text, sent_at);
        self.messages.push(reply.clone());

        let utterance = self.narrator.as_mut().map(|n| n.speak(answer.text));
        Turn { user, reply, action: answer.action, utterance }
    }

    /// Flip the widget open/closed and return the new state.
    ///
    /// Closing the widget silences any narration in flight.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        if !self.open {
            self.stop_speech();
        }
        self.open
    }

    /// Cancel narration, returning the cancelled utterance id.
    pub fn stop_speech(&mut self) -> Option<Uuid> {
        self.narrator.as_mut().and_then(Narrator::stop)
    }

    /// The utterance the client should currently be speaking, if any.
    #[must_use]
    pub fn speaking(&self) -> Option<Uuid> {
        self.narrator.as_ref().and_then(Narrator::current)
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True between `begin_turn` and `complete_turn`.
    #[must_use]
    pub fn awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn capabilities(&self) -> SpeechCapabilities {
        self.capabilities
    }

    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_active = now;
    }

    #[must_use]
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_active)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(SpeechCapabilities::default())
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
