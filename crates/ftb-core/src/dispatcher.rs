//! Update dispatcher: turns one inbound update into at most one reply plus
//! store writes.
//!
//! Decision order for every update:
//! - a document is registered only while the sender is in upload mode
//! - text from a user who was just shown the language picker is a language choice
//! - any other text is a command (group chats only accept `/start` and `/setlanguage`)

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    commands::{self, parse_command, Command},
    domain::{FileOpMode, FileRecord, FileToken, UserId},
    i18n::{Localizer, MessageKey},
    locks::UserLocks,
    messaging::{
        port::{deliver, MessagingPort},
        types::{
            DocumentMessage, DocumentReply, KeyboardDirective, OutboundMessage, ReplyKeyboard,
            TextMessage, TextReply, Update,
        },
    },
    parse::{arrow_row, split_arrow},
    pending::PendingLanguageSelection,
    store::BotStore,
    Result,
};

#[derive(Clone, Debug)]
pub struct DispatchSettings {
    /// Language for users who never picked one.
    pub default_language: String,
    /// Prepended to a token to build its share link, e.g. `https://t.me/FilesBot?start=`.
    pub file_link_prefix: String,
}

pub struct Dispatcher {
    store: Arc<dyn BotStore>,
    localizer: Arc<dyn Localizer>,
    messenger: Arc<dyn MessagingPort>,
    settings: DispatchSettings,
    pending: PendingLanguageSelection,
    user_locks: UserLocks,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn BotStore>,
        localizer: Arc<dyn Localizer>,
        messenger: Arc<dyn MessagingPort>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            localizer,
            messenger,
            settings,
            pending: PendingLanguageSelection::new(),
            user_locks: UserLocks::new(),
        }
    }

    pub fn pending(&self) -> &PendingLanguageSelection {
        &self.pending
    }

    /// Transport entry point: handle the update under the sender's lock and
    /// deliver the reply, if any.
    ///
    /// Store writes are not rolled back when delivery fails.
    pub async fn on_update(&self, update: Update) -> Result<()> {
        let _guard = self.user_locks.lock_user(update.sender()).await;

        let Some(reply) = self.handle(&update).await? else {
            return Ok(());
        };
        deliver(self.messenger.as_ref(), &reply).await?;
        Ok(())
    }

    pub async fn handle(&self, update: &Update) -> Result<Option<OutboundMessage>> {
        match update {
            Update::Document(doc) => self.handle_document(doc).await,
            Update::Text(msg) => {
                if self.pending.take(msg.from) {
                    return self.handle_language_choice(msg).await.map(Some);
                }
                self.handle_command(msg).await
            }
        }
    }

    async fn handle_document(&self, doc: &DocumentMessage) -> Result<Option<OutboundMessage>> {
        let mode = self.store.user_mode(doc.from).await?;
        if mode != FileOpMode::AwaitingUpload {
            debug!(user_id = doc.from.0, ?mode, "document outside upload mode dropped");
            return Ok(None);
        }

        let lang = self.language_of(doc.from).await?;
        self.store
            .register_file(&FileRecord {
                token: doc.file_token.clone(),
                owner: doc.from,
                name: doc.file_name.clone(),
            })
            .await?;
        info!(user_id = doc.from.0, token = %doc.file_token, name = %doc.file_name, "file registered");

        let link = self.share_link(&doc.file_token);
        let text = self
            .localizer
            .text(&lang, MessageKey::FileUploaded, &[("link", link.as_str())]);
        Ok(Some(TextReply::new(doc.chat_id, text).into()))
    }

    async fn handle_language_choice(&self, msg: &TextMessage) -> Result<OutboundMessage> {
        let code = split_arrow(&msg.text).key();

        let text = match self.localizer.language_label(code) {
            Some(label) => {
                self.store.set_user_language(msg.from, code).await?;
                info!(user_id = msg.from.0, language = code, "language changed");
                self.localizer
                    .text(code, MessageKey::LanguageModified, &[("language", label)])
            }
            None => {
                debug!(user_id = msg.from.0, code, "unsupported language choice");
                // Rejected choice: answer in the language the user already has,
                // not the bot default.
                let lang = self.language_of(msg.from).await?;
                self.localizer.text(&lang, MessageKey::ErrorLanguage, &[])
            }
        };

        Ok(TextReply::new(msg.chat_id, text)
            .reply_to(msg.message_id)
            .keyboard(KeyboardDirective::Hide { selective: true })
            .into())
    }

    async fn handle_command(&self, msg: &TextMessage) -> Result<Option<OutboundMessage>> {
        let parsed = parse_command(&msg.text);
        if msg.is_group_chat && !parsed.command.is_some_and(Command::allowed_in_groups) {
            debug!(chat_id = msg.chat_id.0, "group message ignored");
            return Ok(None);
        }

        let lang = self.language_of(msg.from).await?;
        debug!(user_id = msg.from.0, command = ?parsed.command, "dispatching");

        let reply = match parsed.command {
            Some(Command::SetLanguage) => self.language_picker(msg, &lang),
            Some(Command::Start) => match parsed.argument {
                Some(token) => self.send_file(msg, &lang, token).await?,
                None => self.help(msg, &lang),
            },
            Some(Command::Upload) => {
                self.store
                    .set_user_mode(msg.from, FileOpMode::AwaitingUpload)
                    .await?;
                self.reply(msg, &lang, MessageKey::SendFileToUpload)
            }
            Some(Command::Cancel) => {
                self.store.clear_user_mode(msg.from).await?;
                self.reply(msg, &lang, MessageKey::ProcessFinished)
            }
            Some(Command::Delete) => self.delete(msg, &lang, parsed.argument).await?,
            Some(Command::List) => self.list(msg, &lang).await?,
            None => self.help(msg, &lang),
        };
        Ok(Some(reply))
    }

    fn language_picker(&self, msg: &TextMessage, lang: &str) -> OutboundMessage {
        let rows = self
            .localizer
            .supported_languages()
            .iter()
            .map(|(code, label)| arrow_row(code, label))
            .collect();
        self.pending.insert(msg.from);

        let text = self.localizer.text(lang, MessageKey::ChooseLanguage, &[]);
        TextReply::new(msg.chat_id, text)
            .keyboard(KeyboardDirective::ShowOptions(ReplyKeyboard {
                rows,
                selective: true,
            }))
            .into()
    }

    async fn send_file(
        &self,
        msg: &TextMessage,
        lang: &str,
        token: &str,
    ) -> Result<OutboundMessage> {
        let token = FileToken::new(token);
        if !self.store.file_exists(&token).await? {
            return Ok(self.reply(msg, lang, MessageKey::WrongFileId));
        }
        Ok(DocumentReply {
            chat_id: msg.chat_id,
            token,
            reply_to: None,
        }
        .into())
    }

    async fn delete(
        &self,
        msg: &TextMessage,
        lang: &str,
        argument: Option<&str>,
    ) -> Result<OutboundMessage> {
        let mode = self.store.user_mode(msg.from).await?;
        if let (FileOpMode::AwaitingDeleteSelection, Some(arg)) = (mode, argument) {
            // Keyboard rows come back as "/delete <token> --> <name>".
            let token = FileToken::new(split_arrow(arg).key());
            let removed = self.store.delete_file(&token, msg.from).await?;
            self.store.clear_user_mode(msg.from).await?;
            info!(user_id = msg.from.0, token = %token, removed, "delete requested");

            let key = if removed {
                MessageKey::FileDeleted
            } else {
                MessageKey::WrongFileId
            };
            return Ok(self.reply(msg, lang, key));
        }

        self.store
            .set_user_mode(msg.from, FileOpMode::AwaitingDeleteSelection)
            .await?;
        let files = self.store.files_by_user(msg.from).await?;

        let keyboard = if files.is_empty() {
            KeyboardDirective::NoChange
        } else {
            KeyboardDirective::ShowOptions(ReplyKeyboard {
                rows: files
                    .iter()
                    .map(|f| {
                        arrow_row(&format!("{} {}", commands::DELETE, f.token), &f.name)
                    })
                    .collect(),
                selective: false,
            })
        };

        let text = self
            .localizer
            .text(lang, MessageKey::DeleteUploadedFile, &[]);
        Ok(TextReply::new(msg.chat_id, text).keyboard(keyboard).into())
    }

    async fn list(&self, msg: &TextMessage, lang: &str) -> Result<OutboundMessage> {
        let files = self.store.files_by_user(msg.from).await?;
        if files.is_empty() {
            return Ok(self.reply(msg, lang, MessageKey::NoFiles));
        }

        let header = self.localizer.text(lang, MessageKey::ListOfFiles, &[]);
        let lines = files
            .iter()
            .map(|f| arrow_row(&self.share_link(&f.token), &f.name))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(TextReply::new(msg.chat_id, format!("{header}:\n\n{lines}")).into())
    }

    fn help(&self, msg: &TextMessage, lang: &str) -> OutboundMessage {
        let text = self.localizer.text(
            lang,
            MessageKey::HelpFiles,
            &[
                ("start", commands::START),
                ("upload", commands::UPLOAD),
                ("delete", commands::DELETE),
                ("list", commands::LIST),
            ],
        );
        TextReply::new(msg.chat_id, text).into()
    }

    fn reply(&self, msg: &TextMessage, lang: &str, key: MessageKey) -> OutboundMessage {
        TextReply::new(msg.chat_id, self.localizer.text(lang, key, &[])).into()
    }

    fn share_link(&self, token: &FileToken) -> String {
        format!("{}{}", self.settings.file_link_prefix, token)
    }

    async fn language_of(&self, user: UserId) -> Result<String> {
        Ok(self
            .store
            .user_language(user)
            .await?
            .filter(|code| self.localizer.is_supported(code))
            .unwrap_or_else(|| self.settings.default_language.clone()))
    }
}
