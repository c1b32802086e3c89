use crate::domain::{ChatId, FileToken, MessageId, UserId};

/// Inbound update model.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum Update {
    Text(TextMessage),
    Document(DocumentMessage),
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub from: UserId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub is_group_chat: bool,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct DocumentMessage {
    pub from: UserId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub is_group_chat: bool,
    pub file_token: FileToken,
    pub file_name: String,
}

impl Update {
    pub fn sender(&self) -> UserId {
        match self {
            Update::Text(m) => m.from,
            Update::Document(m) => m.from,
        }
    }
}

/// Reply keyboard shown under the input field. One button per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<String>,
    /// Only show the keyboard to the user being replied to.
    pub selective: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyboardDirective {
    #[default]
    NoChange,
    ShowOptions(ReplyKeyboard),
    Hide { selective: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(TextReply),
    Document(DocumentReply),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextReply {
    pub chat_id: ChatId,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub keyboard: KeyboardDirective,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentReply {
    pub chat_id: ChatId,
    pub token: FileToken,
    pub reply_to: Option<MessageId>,
}

impl TextReply {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_to: None,
            keyboard: KeyboardDirective::NoChange,
        }
    }

    pub fn reply_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    pub fn keyboard(mut self, keyboard: KeyboardDirective) -> Self {
        self.keyboard = keyboard;
        self
    }
}

impl From<TextReply> for OutboundMessage {
    fn from(r: TextReply) -> Self {
        OutboundMessage::Text(r)
    }
}

impl From<DocumentReply> for OutboundMessage {
    fn from(r: DocumentReply) -> Self {
        OutboundMessage::Document(r)
    }
}
