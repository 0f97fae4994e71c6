//! Chat widget routes.
//!
//! DESIGN
//! ======
//! Each session is one `Conversation` in `AppState::sessions`. Handlers take
//! the write lock only for the duration of a single conversation call. A turn
//! is two calls: the user message lands, the lock is released for
//! `CHAT_REPLY_DELAY_MS` while the session reads as typing, then the reply
//! lands. No lock is held across an await. At most `CHAT_MAX_SESSIONS`
//! sessions live at once.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ApiError, api_error, json_rejection};
use crate::conversation::{self, ChatMessage, Conversation, ConversationError, Turn};
use crate::responder::{self, Reply};
use crate::speech::{InputSource, SpeechCapabilities};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionBody {
    #[serde(default)]
    pub speech: SpeechCapabilities,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source: InputSource,
}

/// Snapshot of one session as the widget renders it.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub open: bool,
    pub awaiting_reply: bool,
    pub speech: SpeechCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaking: Option<Uuid>,
    pub messages: Vec<ChatMessage>,
}

impl SessionView {
    fn of(id: Uuid, convo: &Conversation) -> Self {
        Self {
            id,
            open: convo.is_open(),
            awaiting_reply: convo.awaiting_reply(),
            speech: convo.capabilities(),
            speaking: convo.speaking(),
            messages: convo.messages().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub open: bool,
}

#[derive(Debug, Serialize)]
pub struct StopSpeechResponse {
    pub cancelled: Option<Uuid>,
}

/// `POST /api/chat/respond`: answer one message without a session.
pub async fn respond_once(body: Result<Json<MessageBody>, JsonRejection>) -> Result<Json<Reply>, ApiError> {
    let Json(body) = body.map_err(json_rejection)?;
    conversation::check_input(&body.text).map_err(conversation_error_to_status)?;
    Ok(Json(responder::respond(&body.text)))
}

/// `POST /api/chat/sessions`: open a session seeded with the greeting.
///
/// The body is optional; an empty body means no speech support.
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let body: CreateSessionBody = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?
    };

    let id = Uuid::new_v4();
    let convo = Conversation::new(body.speech);
    let view = SessionView::of(id, &convo);

    let mut sessions = state.sessions.write().await;
    if sessions.len() >= state.config.max_sessions {
        warn!(active = sessions.len(), "chat session cap reached");
        return Err(api_error(StatusCode::SERVICE_UNAVAILABLE, "Too many open chats right now. Try again later."));
    }
    sessions.insert(id, convo);
    info!(
        %id,
        active = sessions.len(),
        recognition = body.speech.recognition,
        synthesis = body.speech.synthesis,
        "chat session opened"
    );

    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/chat/sessions/{id}`: transcript and widget flags.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let convo = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    convo.touch(Instant::now());
    Ok(Json(SessionView::of(id, convo)))
}

/// `POST /api/chat/sessions/{id}/messages`: submit one turn.
///
/// Responds once the reply has landed, after the configured typing delay.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<MessageBody>, JsonRejection>,
) -> Result<Json<Turn>, ApiError> {
    let Json(body) = body.map_err(json_rejection)?;
    {
        let mut sessions = state.sessions.write().await;
        let convo = sessions.get_mut(&id).ok_or_else(session_not_found)?;
        convo
            .begin_turn(&body.text, body.source)
            .map_err(conversation_error_to_status)?;
    }

    // Finish the turn on its own task so a client hanging up mid-delay
    // cannot leave the session stuck awaiting a reply.
    let delay = state.config.reply_delay;
    let sessions = state.sessions.clone();
    let completion = tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut sessions = sessions.write().await;
        // The session may have been deleted while the reply was pending.
        let convo = sessions.get_mut(&id).ok_or_else(session_not_found)?;
        convo
            .complete_turn()
            .ok_or_else(|| api_error(StatusCode::CONFLICT, "no reply pending"))
    });

    let turn = completion.await.map_err(|e| {
        warn!(%id, error = %e, "chat reply task failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "chat reply failed")
    })??;
    debug!(%id, matched = responder::match_rule(&body.text).is_some(), "chat turn");
    Ok(Json(turn))
}

/// `POST /api/chat/sessions/{id}/toggle`: open or close the widget.
pub async fn toggle(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ToggleResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let convo = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    convo.touch(Instant::now());
    Ok(Json(ToggleResponse { open: convo.toggle() }))
}

/// `POST /api/chat/sessions/{id}/speech/stop`: cancel narration in flight.
pub async fn stop_speech(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StopSpeechResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let convo = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    convo.touch(Instant::now());
    Ok(Json(StopSpeechResponse { cancelled: convo.stop_speech() }))
}

/// `DELETE /api/chat/sessions/{id}`: end the session and drop its transcript.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.sessions.write().await.remove(&id).is_some() {
        info!(%id, "chat session closed");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn session_not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "chat session not found")
}

pub(crate) fn conversation_error_to_status(err: ConversationError) -> ApiError {
    let status = match err {
        ConversationError::EmptyInput | ConversationError::InputTooLong { .. } => StatusCode::BAD_REQUEST,
        ConversationError::TranscriptFull { .. } | ConversationError::ReplyPending => StatusCode::CONFLICT,
    };
    api_error(status, err.to_string())
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
