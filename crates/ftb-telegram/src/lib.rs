//! Telegram adapter (teloxide).
//!
//! This crate implements the `ftb-core` MessagingPort over the Telegram Bot API
//! and feeds incoming messages to the core dispatcher.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup},
};

use tokio::time::sleep;
use tracing::warn;

pub mod handlers;
pub mod router;

use ftb_core::{
    domain::{ChatId, FileToken, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::KeyboardDirective},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::SenderUnavailable(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        warn!(retry_after = ?d, "telegram flood control, retrying");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// Translate a keyboard directive into Telegram reply markup.
///
/// Shown keyboards are one button per row, resized and one-time.
pub fn reply_markup(keyboard: &KeyboardDirective) -> Option<ReplyMarkup> {
    match keyboard {
        KeyboardDirective::NoChange => None,
        KeyboardDirective::ShowOptions(k) => {
            let rows = k
                .rows
                .iter()
                .map(|row| vec![KeyboardButton::new(row.clone())]);
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(rows)
                    .resize_keyboard(true)
                    .one_time_keyboard(true)
                    .selective(k.selective),
            ))
        }
        KeyboardDirective::Hide { selective } => Some(ReplyMarkup::KeyboardRemove(
            KeyboardRemove::new().selective(*selective),
        )),
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
        keyboard: &KeyboardDirective,
    ) -> Result<MessageRef> {
        let markup = reply_markup(keyboard);
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_message(Self::tg_chat(chat_id), text.to_string());
                if let Some(id) = reply_to {
                    req = req.reply_to_message_id(Self::tg_msg_id(id));
                }
                if let Some(m) = &markup {
                    req = req.reply_markup(m.clone());
                }
                req
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        token: &FileToken,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                let mut req = self.bot.send_document(
                    Self::tg_chat(chat_id),
                    InputFile::file_id(token.as_str()),
                );
                if let Some(id) = reply_to {
                    req = req.reply_to_message_id(Self::tg_msg_id(id));
                }
                req
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}
