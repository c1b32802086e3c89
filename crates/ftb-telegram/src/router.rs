use std::sync::Arc;

use teloxide::{
    dispatching::Dispatcher,
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    update_listeners::webhooks,
};
use tracing::info;

use ftb_core::{
    config::{Config, UpdateSource},
    dispatcher::{DispatchSettings, Dispatcher as FilesDispatcher},
    i18n::FluentLocalizer,
    messaging::{
        port::MessagingPort,
        throttled::ThrottledMessenger,
    },
    store::BotStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<FilesDispatcher>,
}

/// Share-link prefix used when none is configured: opening the link sends
/// `/start <token>` to the bot.
pub fn default_link_prefix(bot_username: &str) -> String {
    format!("https://t.me/{bot_username}?start=")
}

pub async fn run(cfg: Arc<Config>, store: Arc<dyn BotStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let me = bot.get_me().await?;
    info!(username = me.username(), "files bot started");

    let file_link_prefix = cfg
        .file_link_prefix
        .clone()
        .unwrap_or_else(|| default_link_prefix(me.username()));

    let raw: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(raw, cfg.throttle));

    let dispatcher = FilesDispatcher::new(
        store,
        Arc::new(FluentLocalizer::new()),
        messenger,
        DispatchSettings {
            default_language: cfg.default_language.clone(),
            file_link_prefix,
        },
    );
    let state = Arc::new(AppState {
        dispatcher: Arc::new(dispatcher),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut tg = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build();

    match &cfg.update_source {
        UpdateSource::LongPolling => {
            // A leftover webhook makes getUpdates fail.
            bot.delete_webhook().await?;
            info!("receiving updates by long polling");
            tg.dispatch().await;
        }
        UpdateSource::Webhook { url, listen_addr } => {
            let url: url::Url = url.parse()?;
            info!(%url, %listen_addr, "receiving updates by webhook");
            let listener = webhooks::axum(bot, webhooks::Options::new(*listen_addr, url)).await?;
            tg.dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("webhook listener error"),
            )
            .await;
        }
    }

    Ok(())
}
