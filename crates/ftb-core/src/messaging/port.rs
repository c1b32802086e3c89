use async_trait::async_trait;

use crate::{
    domain::{ChatId, FileToken, MessageId, MessageRef},
    messaging::types::{KeyboardDirective, OutboundMessage},
    Result,
};

/// Outbound messaging port.
///
/// Transport failures come back as `Error::SenderUnavailable`; retries beyond
/// what the adapter does itself are the caller's business.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
        keyboard: &KeyboardDirective,
    ) -> Result<MessageRef>;

    async fn send_document(
        &self,
        chat_id: ChatId,
        token: &FileToken,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef>;
}

/// Send one dispatcher reply through the port.
pub async fn deliver(port: &dyn MessagingPort, msg: &OutboundMessage) -> Result<MessageRef> {
    match msg {
        OutboundMessage::Text(r) => {
            port.send_text(r.chat_id, &r.text, r.reply_to, &r.keyboard)
                .await
        }
        OutboundMessage::Document(r) => port.send_document(r.chat_id, &r.token, r.reply_to).await,
    }
}
