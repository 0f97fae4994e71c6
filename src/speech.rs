//! Optional browser speech capabilities for the chat widget.
//!
//! The browser owns the actual recognition and synthesis engines. The server
//! only learns, once per session, which of them exist and keeps track of the
//! utterance currently being spoken so that each new reply cancels the old
//! one instead of queueing behind it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the client reported when the session was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechCapabilities {
    /// Single-shot speech-to-text is available.
    #[serde(default)]
    pub recognition: bool,
    /// Text-to-speech is available.
    #[serde(default)]
    pub synthesis: bool,
}

impl SpeechCapabilities {
    /// Resolve the synthesis capability into a narrator, or nothing.
    #[must_use]
    pub fn narrator(self) -> Option<Narrator> {
        self.synthesis.then(Narrator::default)
    }
}

/// How a user message reached the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    #[default]
    Text,
    Voice,
}

/// An instruction for the client to speak `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    /// The in-flight utterance this one replaces, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancels: Option<Uuid>,
}

/// Cancel-and-replace bookkeeping for text-to-speech.
#[derive(Debug, Default)]
pub struct Narrator {
    current: Option<Uuid>,
}

impl Narrator {
    /// Start speaking `text`, superseding whatever is in flight.
    pub fn speak(&mut self, text: impl Into<String>) -> Utterance {
        let id = Uuid::new_v4();
        let cancels = self.current.replace(id);
        Utterance { id, text: text.into(), cancels }
    }

    /// Cancel the in-flight utterance. Returns its id if there was one.
    pub fn stop(&mut self) -> Option<Uuid> {
        self.current.take()
    }

    #[must_use]
    pub fn current(&self) -> Option<Uuid> {
        self.current
    }
}

#[cfg(test)]
#[path = "speech_test.rs"]
mod tests;
