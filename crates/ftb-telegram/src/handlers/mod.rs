//! Telegram update handlers.
//!
//! Incoming messages are converted into core `Update`s and handed to the
//! dispatcher. Anything that is neither text nor a document, or has no sender,
//! is ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::{debug, error};

use ftb_core::{
    domain::{ChatId, MessageId, UserId},
    messaging::types::Update as FilesUpdate,
};

use crate::router::AppState;
mod document;
mod text;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(update) = to_update(&msg) else {
        debug!(chat_id = msg.chat.id.0, "ignoring unsupported message");
        return Ok(());
    };

    // Failures are logged, never surfaced to teloxide, so one bad update
    // cannot stall the listener.
    if let Err(e) = state.dispatcher.on_update(update).await {
        error!(chat_id = msg.chat.id.0, error = %e, "failed to handle update");
    }
    Ok(())
}

/// Fields every supported message shares.
pub(crate) struct Envelope {
    pub from: UserId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub is_group_chat: bool,
}

pub(crate) fn to_update(msg: &Message) -> Option<FilesUpdate> {
    let user = msg.from()?;
    let envelope = Envelope {
        from: UserId(user.id.0 as i64),
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        is_group_chat: msg.chat.is_group() || msg.chat.is_supergroup(),
    };

    if let Some(text) = msg.text() {
        return Some(text::text_update(envelope, text));
    }
    msg.document().map(|doc| document::document_update(envelope, doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftb_core::messaging::types::{DocumentMessage, TextMessage};
    use serde_json::{json, Value};

    fn private_chat() -> Value {
        json!({"id": 42, "type": "private", "first_name": "Ann"})
    }

    fn sender() -> Value {
        json!({"id": 42, "is_bot": false, "first_name": "Ann"})
    }

    fn message(chat: Value, from: Option<Value>, body: Value) -> Message {
        let mut raw = json!({
            "message_id": 7,
            "date": 1_700_000_000,
            "chat": chat,
        });
        if let Some(from) = from {
            raw["from"] = from;
        }
        for (k, v) in body.as_object().unwrap() {
            raw[k] = v.clone();
        }
        serde_json::from_value(raw).unwrap()
    }

    fn text_in(chat: Value) -> Option<FilesUpdate> {
        to_update(&message(chat, Some(sender()), json!({"text": "/start"})))
    }

    #[test]
    fn private_text_becomes_text_update() {
        let TextMessage {
            from,
            chat_id,
            message_id,
            is_group_chat,
            text,
        } = match text_in(private_chat()) {
            Some(FilesUpdate::Text(m)) => m,
            other => panic!("expected text update, got {other:?}"),
        };
        assert_eq!(from, UserId(42));
        assert_eq!(chat_id, ChatId(42));
        assert_eq!(message_id, MessageId(7));
        assert!(!is_group_chat);
        assert_eq!(text, "/start");
    }

    #[test]
    fn group_and_supergroup_are_group_chats() {
        for chat in [
            json!({"id": -5, "type": "group", "title": "Team"}),
            json!({"id": -1001, "type": "supergroup", "title": "Big team"}),
        ] {
            match text_in(chat) {
                Some(FilesUpdate::Text(m)) => assert!(m.is_group_chat),
                other => panic!("expected text update, got {other:?}"),
            }
        }
    }

    #[test]
    fn message_without_sender_is_ignored() {
        let msg = message(private_chat(), None, json!({"text": "/list"}));
        assert!(to_update(&msg).is_none());
    }

    #[test]
    fn non_text_non_document_is_ignored() {
        let msg = message(
            private_chat(),
            Some(sender()),
            json!({"location": {"longitude": 12.5, "latitude": 41.9}}),
        );
        assert!(to_update(&msg).is_none());
    }

    #[test]
    fn document_keeps_token_and_name() {
        let msg = message(
            private_chat(),
            Some(sender()),
            json!({"document": {
                "file_id": "BQACAgI",
                "file_unique_id": "AgAD",
                "file_size": 1024,
                "file_name": "report.pdf",
            }}),
        );
        let DocumentMessage {
            from,
            file_token,
            file_name,
            ..
        } = match to_update(&msg) {
            Some(FilesUpdate::Document(d)) => d,
            other => panic!("expected document update, got {other:?}"),
        };
        assert_eq!(from, UserId(42));
        assert_eq!(file_token.as_str(), "BQACAgI");
        assert_eq!(file_name, "report.pdf");
    }

    #[test]
    fn unnamed_document_gets_placeholder_name() {
        let msg = message(
            private_chat(),
            Some(sender()),
            json!({"document": {
                "file_id": "BQACAgI",
                "file_unique_id": "AgAD",
                "file_size": 1024,
            }}),
        );
        match to_update(&msg) {
            Some(FilesUpdate::Document(d)) => assert_eq!(d.file_name, "document"),
            other => panic!("expected document update, got {other:?}"),
        }
    }
}
