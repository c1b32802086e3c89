use std::{env, net::SocketAddr, time::Duration};

use crate::{
    errors::Error, i18n::is_language_supported, messaging::throttled::ThrottleConfig, Result,
};

/// How updates reach the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateSource {
    LongPolling,
    Webhook {
        /// Public HTTPS URL Telegram posts updates to.
        url: String,
        listen_addr: SocketAddr,
    },
}

/// Typed configuration, read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub default_language: String,
    /// Prepended to a token to build its share link. `None` derives it from the
    /// bot username at startup.
    pub file_link_prefix: Option<String>,
    pub database_url: String,
    pub update_source: UpdateSource,
    pub throttle: ThrottleConfig,
}

pub const MEMORY_DATABASE_URL: &str = "memory";

const DEFAULT_DATABASE_URL: &str = "sqlite://files-bot.db";
const DEFAULT_WEBHOOK_LISTEN_ADDR: &str = "0.0.0.0:8443";

impl Config {
    pub fn load() -> Result<Self> {
        // Existing env vars win over `.env`.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = var("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;

        let default_language = var("DEFAULT_LANGUAGE")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| crate::i18n::DEFAULT_LANGUAGE.to_string());
        if !is_language_supported(&default_language) {
            return Err(Error::Config(format!(
                "DEFAULT_LANGUAGE {default_language:?} is not a supported language"
            )));
        }

        let file_link_prefix = var("FILES_LINK_PREFIX");
        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let update_source = if var("USE_WEBHOOK").map(|s| parse_bool(&s)).unwrap_or(false) {
            let url = var("WEBHOOK_URL").ok_or_else(|| {
                Error::Config("WEBHOOK_URL is required when USE_WEBHOOK is set".to_string())
            })?;
            let addr = var("WEBHOOK_LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_WEBHOOK_LISTEN_ADDR.to_string());
            let listen_addr = addr.trim().parse::<SocketAddr>().map_err(|e| {
                Error::Config(format!("WEBHOOK_LISTEN_ADDR {addr:?} is invalid: {e}"))
            })?;
            UpdateSource::Webhook { url, listen_addr }
        } else {
            UpdateSource::LongPolling
        };

        let defaults = ThrottleConfig::default();
        let throttle = ThrottleConfig {
            global_min_interval: parse_millis(var("THROTTLE_GLOBAL_MS"))
                .unwrap_or(defaults.global_min_interval),
            per_chat_min_interval: parse_millis(var("THROTTLE_PER_CHAT_MS"))
                .unwrap_or(defaults.per_chat_min_interval),
        };

        Ok(Self {
            telegram_bot_token,
            default_language,
            file_link_prefix,
            database_url,
            update_source,
            throttle,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_millis(v: Option<String>) -> Option<Duration> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load(&[("TELEGRAM_BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(cfg.telegram_bot_token, "123:abc");
        assert_eq!(cfg.default_language, "en");
        assert_eq!(cfg.file_link_prefix, None);
        assert_eq!(cfg.database_url, "sqlite://files-bot.db");
        assert_eq!(cfg.update_source, UpdateSource::LongPolling);
        assert_eq!(cfg.throttle, ThrottleConfig::default());
        assert!(!cfg.uses_memory_store());
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(load(&[]), Err(Error::Config(_))));
        assert!(matches!(
            load(&[("TELEGRAM_BOT_TOKEN", "  ")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_unsupported_default_language() {
        let err = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("DEFAULT_LANGUAGE", "xx")]);
        assert!(matches!(err, Err(Error::Config(_))));

        let cfg = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("DEFAULT_LANGUAGE", "es")]).unwrap();
        assert_eq!(cfg.default_language, "es");
    }

    #[test]
    fn webhook_mode() {
        let cfg = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("USE_WEBHOOK", "true"),
            ("WEBHOOK_URL", "https://bot.example.com/filesBot"),
            ("WEBHOOK_LISTEN_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();
        assert_eq!(
            cfg.update_source,
            UpdateSource::Webhook {
                url: "https://bot.example.com/filesBot".to_string(),
                listen_addr: "127.0.0.1:9000".parse().unwrap(),
            }
        );

        let missing_url = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("USE_WEBHOOK", "1")]);
        assert!(matches!(missing_url, Err(Error::Config(_))));
    }

    #[test]
    fn overrides() {
        let cfg = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("DATABASE_URL", "memory"),
            ("FILES_LINK_PREFIX", "https://t.me/MyFilesBot?start="),
            ("THROTTLE_GLOBAL_MS", "0"),
            ("THROTTLE_PER_CHAT_MS", "not a number"),
        ])
        .unwrap();
        assert!(cfg.uses_memory_store());
        assert_eq!(
            cfg.file_link_prefix.as_deref(),
            Some("https://t.me/MyFilesBot?start=")
        );
        assert_eq!(cfg.throttle.global_min_interval, Duration::ZERO);
        assert_eq!(
            cfg.throttle.per_chat_min_interval,
            ThrottleConfig::default().per_chat_min_interval
        );
    }
}
