use teloxide::types::Document;

use ftb_core::{
    domain::FileToken,
    messaging::types::{DocumentMessage, Update},
};

use super::Envelope;

/// Name stored when Telegram does not report one.
const UNNAMED_DOCUMENT: &str = "document";

pub(super) fn document_update(envelope: Envelope, doc: &Document) -> Update {
    Update::Document(DocumentMessage {
        from: envelope.from,
        chat_id: envelope.chat_id,
        message_id: envelope.message_id,
        is_group_chat: envelope.is_group_chat,
        file_token: FileToken::new(doc.file.id.clone()),
        file_name: doc
            .file_name
            .clone()
            .unwrap_or_else(|| UNNAMED_DOCUMENT.to_string()),
    })
}
