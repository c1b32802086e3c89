use ftb_core::messaging::types::{TextMessage, Update};

use super::Envelope;

pub(super) fn text_update(envelope: Envelope, text: &str) -> Update {
    Update::Text(TextMessage {
        from: envelope.from,
        chat_id: envelope.chat_id,
        message_id: envelope.message_id,
        is_group_chat: envelope.is_group_chat,
        text: text.to_string(),
    })
}
