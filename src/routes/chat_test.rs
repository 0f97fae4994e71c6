use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::config::SiteConfig;
use crate::conversation::{MAX_TRANSCRIPT_MESSAGES, Sender};
use crate::portfolio::Section;
use crate::responder::{Action, FALLBACK, GREETING};
use crate::state::test_helpers;

fn message(text: &str) -> Result<Json<MessageBody>, JsonRejection> {
    Ok(Json(MessageBody { text: text.into(), source: InputSource::Text }))
}

fn state_with(config: SiteConfig) -> AppState {
    test_helpers::test_app_state_with(config, None, Arc::new(test_helpers::NoRepos))
}

async fn open_session(state: &AppState, body: &str) -> SessionView {
    let (status, Json(view)) = create_session(State(state.clone()), Bytes::from(body.to_owned()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    view
}

// =============================================================================
// stateless respond
// =============================================================================

#[tokio::test]
async fn respond_once_matches_rules() {
    let Json(reply) = respond_once(message("Can you tell me about his experience?")).await.unwrap();
    assert!(reply.text.contains("Founder's Office Intern"));
    assert!(reply.action.is_none());

    let Json(reply) = respond_once(message("zzz unmatched gibberish")).await.unwrap();
    assert_eq!(reply.text, FALLBACK);
}

#[tokio::test]
async fn respond_once_rejects_blank_input() {
    let (status, Json(body)) = respond_once(message("   ")).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.message, "message is empty");
}

// =============================================================================
// sessions
// =============================================================================

#[tokio::test]
async fn create_session_with_empty_body_seeds_greeting() {
    let state = test_helpers::test_app_state();
    let view = open_session(&state, "").await;

    assert!(!view.open);
    assert!(!view.awaiting_reply);
    assert_eq!(view.speech, SpeechCapabilities::default());
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.messages[0].text, GREETING);
    assert_eq!(view.messages[0].sender, Sender::Bot);
    assert!(state.sessions.read().await.contains_key(&view.id));
}

#[tokio::test]
async fn create_session_reads_speech_capabilities() {
    let state = test_helpers::test_app_state();
    let view = open_session(&state, r#"{"speech":{"synthesis":true}}"#).await;
    assert!(view.speech.synthesis);
    assert!(!view.speech.recognition);
}

#[tokio::test]
async fn create_session_rejects_malformed_body() {
    let state = test_helpers::test_app_state();
    let (status, _) = create_session(State(state.clone()), Bytes::from_static(b"{not json"))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.sessions.read().await.is_empty());
}

#[tokio::test]
async fn post_message_appends_turn_in_order() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;

    let Json(turn) = post_message(State(state.clone()), Path(id), message("go to contact"))
        .await
        .unwrap();
    assert_eq!(turn.user.text, "go to contact");
    assert_eq!(turn.action, Some(Action::Navigate { target: Section::Contact }));
    assert!(turn.utterance.is_none());

    let Json(view) = get_session(State(state), Path(id)).await.unwrap();
    let texts: Vec<_> = view.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, [GREETING, "go to contact", turn.reply.text.as_str()]);
}

#[tokio::test]
async fn post_message_blank_is_400_and_leaves_transcript() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;

    let (status, _) = post_message(State(state.clone()), Path(id), message("\n\t "))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.sessions.read().await[&id].messages().len(), 1);
}

#[tokio::test]
async fn synthesis_sessions_get_utterances() {
    let state = test_helpers::test_app_state();
    let view = open_session(&state, r#"{"speech":{"synthesis":true}}"#).await;

    let Json(first) = post_message(State(state.clone()), Path(view.id), message("hello"))
        .await
        .unwrap();
    let first = first.utterance.unwrap();
    assert!(first.cancels.is_none());

    let Json(second) = post_message(State(state.clone()), Path(view.id), message("skills?"))
        .await
        .unwrap();
    assert_eq!(second.utterance.as_ref().unwrap().cancels, Some(first.id));

    let Json(current) = get_session(State(state.clone()), Path(view.id)).await.unwrap();
    assert_eq!(current.speaking, second.utterance.map(|u| u.id));

    let Json(stopped) = stop_speech(State(state.clone()), Path(view.id)).await.unwrap();
    assert_eq!(stopped.cancelled, current.speaking);
    let Json(stopped) = stop_speech(State(state), Path(view.id)).await.unwrap();
    assert!(stopped.cancelled.is_none());
}

#[tokio::test]
async fn toggle_flips_open_flag() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;

    let Json(res) = toggle(State(state.clone()), Path(id)).await.unwrap();
    assert!(res.open);
    let Json(res) = toggle(State(state.clone()), Path(id)).await.unwrap();
    assert!(!res.open);
    assert_eq!(state.sessions.read().await[&id].messages().len(), 1);
}

#[tokio::test]
async fn unknown_session_is_404_everywhere() {
    let state = test_helpers::test_app_state();
    let id = Uuid::new_v4();

    assert_eq!(get_session(State(state.clone()), Path(id)).await.unwrap_err().0, StatusCode::NOT_FOUND);
    assert_eq!(
        post_message(State(state.clone()), Path(id), message("hi")).await.unwrap_err().0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(toggle(State(state.clone()), Path(id)).await.unwrap_err().0, StatusCode::NOT_FOUND);
    assert_eq!(stop_speech(State(state.clone()), Path(id)).await.unwrap_err().0, StatusCode::NOT_FOUND);
    assert_eq!(delete_session(State(state), Path(id)).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_session_drops_transcript() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;

    assert_eq!(delete_session(State(state.clone()), Path(id)).await, StatusCode::NO_CONTENT);
    assert!(state.sessions.read().await.is_empty());
}

#[test]
fn conversation_errors_map_to_status() {
    let (status, Json(body)) = conversation_error_to_status(ConversationError::InputTooLong { max: 2000 });
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.message, "message exceeds 2000 characters");

    let (status, _) = conversation_error_to_status(ConversationError::TranscriptFull { max: 201 });
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = conversation_error_to_status(ConversationError::ReplyPending);
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// limits
// =============================================================================

#[tokio::test]
async fn session_cap_refuses_new_sessions() {
    let state = state_with(SiteConfig { max_sessions: 2, reply_delay: Duration::ZERO, ..SiteConfig::default() });
    let first = open_session(&state, "").await;
    open_session(&state, "").await;

    let (status, Json(body)) = create_session(State(state.clone()), Bytes::new()).await.unwrap_err();
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!body.message.is_empty());
    assert_eq!(state.sessions.read().await.len(), 2);

    // Ending a session frees a slot.
    assert_eq!(delete_session(State(state.clone()), Path(first.id)).await, StatusCode::NO_CONTENT);
    open_session(&state, "").await;
}

#[tokio::test]
async fn full_transcript_is_409() {
    let state = test_helpers::test_app_state();
    let id = test_helpers::seed_session(&state).await;
    for _ in 0..(MAX_TRANSCRIPT_MESSAGES - 1) / 2 {
        post_message(State(state.clone()), Path(id), message("skills")).await.unwrap();
    }

    let (status, _) = post_message(State(state.clone()), Path(id), message("skills")).await.unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(state.sessions.read().await[&id].messages().len(), MAX_TRANSCRIPT_MESSAGES);
}

// =============================================================================
// typing delay
// =============================================================================

#[tokio::test(start_paused = true)]
async fn session_reads_as_typing_until_reply_lands() {
    let state = state_with(SiteConfig { reply_delay: Duration::from_millis(1000), ..SiteConfig::default() });
    let id = test_helpers::seed_session(&state).await;

    let pending = tokio::spawn(post_message(State(state.clone()), Path(id), message("education")));
    for _ in 0..100 {
        if state.sessions.read().await[&id].awaiting_reply() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let Json(view) = get_session(State(state.clone()), Path(id)).await.unwrap();
    assert!(view.awaiting_reply);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[1].text, "education");

    let (status, _) = post_message(State(state.clone()), Path(id), message("skills")).await.unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);

    let Json(turn) = pending.await.unwrap().unwrap();
    assert_eq!(turn.user.text, "education");

    let Json(view) = get_session(State(state), Path(id)).await.unwrap();
    assert!(!view.awaiting_reply);
    assert_eq!(view.messages.len(), 3);
    assert_eq!(view.messages[2], turn.reply);
}

#[tokio::test(start_paused = true)]
async fn reply_lands_even_if_caller_goes_away() {
    let state = state_with(SiteConfig { reply_delay: Duration::from_millis(1000), ..SiteConfig::default() });
    let id = test_helpers::seed_session(&state).await;

    let caller = tokio::spawn(post_message(State(state.clone()), Path(id), message("blog")));
    for _ in 0..100 {
        if state.sessions.read().await[&id].awaiting_reply() {
            break;
        }
        tokio::task::yield_now().await;
    }
    caller.abort();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let sessions = state.sessions.read().await;
    let convo = &sessions[&id];
    assert!(!convo.awaiting_reply());
    assert_eq!(convo.messages().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn deleting_session_mid_reply_is_404() {
    let state = state_with(SiteConfig { reply_delay: Duration::from_millis(1000), ..SiteConfig::default() });
    let id = test_helpers::seed_session(&state).await;

    let pending = tokio::spawn(post_message(State(state.clone()), Path(id), message("hello")));
    for _ in 0..100 {
        if state.sessions.read().await[&id].awaiting_reply() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(delete_session(State(state), Path(id)).await, StatusCode::NO_CONTENT);

    let (status, _) = pending.await.unwrap().unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}
