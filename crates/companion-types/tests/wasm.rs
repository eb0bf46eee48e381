//! WASM-target tests for companion-types.
//!
//! Covers the wire-format parsing that has to behave identically in the
//! browser, via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use companion_types::message::*;
use companion_types::session::*;
use companion_types::emotion::*;
use companion_types::mood::*;
use companion_types::wellness::*;
use companion_types::practice::*;
use companion_types::config::*;
use companion_types::error::*;

#[wasm_bindgen_test]
fn welcome_message_is_ai() {
    let msg = ChatMessage::welcome();
    assert_eq!(msg.sender, Sender::Ai);
    assert_eq!(msg.content, WELCOME_MESSAGE);
    assert!(!msg.timestamp.is_empty());
}

#[wasm_bindgen_test]
fn chat_reply_with_session() {
    let reply: ChatReply =
        serde_json::from_str(r#"{"response": "Hi", "session_id": "S1", "emotion": "joy"}"#).unwrap();
    assert_eq!(reply.session_id.as_deref(), Some("S1"));
    assert_eq!(reply.emotion.as_deref(), Some("joy"));
}

#[wasm_bindgen_test]
fn session_list_wrapped() {
    let list: SessionListResponse =
        serde_json::from_str(r#"{"sessions": [{"id": "a"}, {"id": "b", "title": "Hello"}]}"#).unwrap();
    let sessions = list.into_sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].display_title(), "New Chat");
    assert_eq!(sessions[1].display_title(), "Hello");
}

#[wasm_bindgen_test]
fn emotion_label_score_spelling() {
    let r: AnalyzeImageResponse =
        serde_json::from_str(r#"{"emotions": [{"label": "sad", "score": 0.25}]}"#).unwrap();
    assert_eq!(r.emotions[0].label, "sad");
    assert_eq!(r.emotions[0].percent_label(), "25.0%");
}

#[wasm_bindgen_test]
fn mood_entry_serializes_flat() {
    let entry = MoodForm::default().to_entry();
    let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["mood"], 5);
    assert_eq!(json["energy"], 5);
    assert_eq!(json["stress"], 5);
    assert_eq!(json["notes"], "");
}

#[wasm_bindgen_test]
fn reminders_fallback_icons() {
    let icons: Vec<&str> = Reminder::fallback().iter().map(|r| r.icon()).collect();
    assert_eq!(icons, vec!["💧", "🚶", "🫁"]);
}

#[wasm_bindgen_test]
fn clock_format() {
    assert_eq!(format_clock(5 * 60), "05:00");
    assert_eq!(format_clock(1), "00:01");
}

#[wasm_bindgen_test]
fn config_roundtrip_through_storage_bytes() {
    let mut config = CompanionConfig::default();
    config.backend.base_url = "https://example.test".to_string();
    let bytes = serde_json::to_vec(&config).unwrap();
    let restored: CompanionConfig = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(restored, config);
}

#[wasm_bindgen_test]
fn backend_error_message_surfaces() {
    let err = CompanionError::Backend { status: 400, message: Some("Username taken".into()) };
    assert_eq!(err.user_message("Registration failed"), "Username taken");
}
