use std::collections::HashMap;

use fluent_templates::{fluent_bundle::FluentValue, static_loader, Loader};
use tracing::warn;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "./locales",
        fallback_language: "en",
        // Telegram renders the isolation marks as stray characters inside links.
        customise: |bundle| bundle.set_use_isolating(false),
    };
}

/// Supported languages (code, human-readable name), in picker order.
pub static SUPPORTED_LANGS: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("nl", "Nederlands"),
    ("pt", "Português"),
];

pub const DEFAULT_LANGUAGE: &str = "en";

/// Every user-visible string the bot sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    LanguageModified,
    ErrorLanguage,
    ChooseLanguage,
    WrongFileId,
    HelpFiles,
    SendFileToUpload,
    ProcessFinished,
    FileDeleted,
    DeleteUploadedFile,
    ListOfFiles,
    NoFiles,
    FileUploaded,
}

impl MessageKey {
    pub fn id(self) -> &'static str {
        match self {
            MessageKey::LanguageModified => "language-modified",
            MessageKey::ErrorLanguage => "error-language",
            MessageKey::ChooseLanguage => "choose-language",
            MessageKey::WrongFileId => "wrong-file-id",
            MessageKey::HelpFiles => "help-files",
            MessageKey::SendFileToUpload => "send-file-to-upload",
            MessageKey::ProcessFinished => "process-finished",
            MessageKey::FileDeleted => "file-deleted",
            MessageKey::DeleteUploadedFile => "delete-uploaded-file",
            MessageKey::ListOfFiles => "list-of-files",
            MessageKey::NoFiles => "no-files",
            MessageKey::FileUploaded => "file-uploaded",
        }
    }

    /// Variables the message references in every `.ftl` bundle.
    pub fn arg_names(self) -> &'static [&'static str] {
        match self {
            MessageKey::LanguageModified => &["language"],
            MessageKey::HelpFiles => &["start", "upload", "delete", "list"],
            MessageKey::FileUploaded => &["link"],
            _ => &[],
        }
    }
}

/// Localization port.
pub trait Localizer: Send + Sync {
    /// Look up `key` in `lang`, interpolating named `args`.
    fn text(&self, lang: &str, key: MessageKey, args: &[(&str, &str)]) -> String;

    /// Supported `(code, label)` pairs; iteration order is the keyboard row order.
    fn supported_languages(&self) -> &[(&'static str, &'static str)];

    fn is_supported(&self, code: &str) -> bool {
        self.language_label(code).is_some()
    }

    fn language_label(&self, code: &str) -> Option<&'static str> {
        self.supported_languages()
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }
}

/// Localizer over the `.ftl` bundles compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct FluentLocalizer;

impl FluentLocalizer {
    pub fn new() -> Self {
        Self
    }
}

fn lang_id(code: &str) -> LanguageIdentifier {
    code.parse::<LanguageIdentifier>()
        .or_else(|_| DEFAULT_LANGUAGE.parse())
        .unwrap_or_default()
}

impl Localizer for FluentLocalizer {
    fn text(&self, lang: &str, key: MessageKey, args: &[(&str, &str)]) -> String {
        // fluent-templates panics on an unresolved variable.
        if let Some(missing) = key
            .arg_names()
            .iter()
            .find(|name| !args.iter().any(|(k, _)| k == *name))
        {
            warn!(key = key.id(), missing = *missing, "message rendered without a required argument");
            return key.id().to_string();
        }

        let lang = lang_id(lang);
        let found = if args.is_empty() {
            LOCALES.lookup(&lang, key.id())
        } else {
            let args: HashMap<String, FluentValue> = args
                .iter()
                .map(|(k, v)| (k.to_string(), FluentValue::from(v.to_string())))
                .collect();
            LOCALES.lookup_with_args(&lang, key.id(), &args)
        };
        found.unwrap_or_else(|| key.id().to_string())
    }

    fn supported_languages(&self) -> &[(&'static str, &'static str)] {
        SUPPORTED_LANGS
    }
}

/// Checks a code against the shipped languages (exact match).
pub fn is_language_supported(code: &str) -> bool {
    SUPPORTED_LANGS.iter().any(|(c, _)| *c == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [MessageKey; 12] = [
        MessageKey::LanguageModified,
        MessageKey::ErrorLanguage,
        MessageKey::ChooseLanguage,
        MessageKey::WrongFileId,
        MessageKey::HelpFiles,
        MessageKey::SendFileToUpload,
        MessageKey::ProcessFinished,
        MessageKey::FileDeleted,
        MessageKey::DeleteUploadedFile,
        MessageKey::ListOfFiles,
        MessageKey::NoFiles,
        MessageKey::FileUploaded,
    ];

    #[test]
    fn every_key_is_translated_in_every_language() {
        let l = FluentLocalizer::new();
        for (code, _) in SUPPORTED_LANGS {
            for key in ALL_KEYS {
                let args: Vec<(&str, &str)> =
                    key.arg_names().iter().map(|name| (*name, "ARG")).collect();
                let text = l.text(code, key, &args);
                assert_ne!(text, key.id(), "{code} is missing {}", key.id());
                if !args.is_empty() {
                    assert!(text.contains("ARG"), "{code} {} ignores its args", key.id());
                }
            }
        }
    }

    #[test]
    fn missing_argument_falls_back_to_key_id() {
        let l = FluentLocalizer::new();
        assert_eq!(l.text("en", MessageKey::HelpFiles, &[]), "help-files");
        assert_eq!(
            l.text("it", MessageKey::FileUploaded, &[("language", "x")]),
            "file-uploaded"
        );
    }

    #[test]
    fn interpolates_without_isolation_marks() {
        let l = FluentLocalizer::new();
        let text = l.text(
            "en",
            MessageKey::FileUploaded,
            &[("link", "https://t.me/files?start=BQAC")],
        );
        assert!(text.ends_with("https://t.me/files?start=BQAC"));
        assert!(!text.contains('\u{2068}'));
    }

    #[test]
    fn help_lists_all_commands() {
        let l = FluentLocalizer::new();
        let text = l.text(
            "es",
            MessageKey::HelpFiles,
            &[
                ("start", "/start"),
                ("upload", "/upload"),
                ("delete", "/delete"),
                ("list", "/list"),
            ],
        );
        for cmd in ["/start", "/upload", "/delete", "/list"] {
            assert!(text.contains(cmd), "missing {cmd}: {text}");
        }
        assert!(text.contains('\n'));
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let l = FluentLocalizer::new();
        assert_eq!(
            l.text("fr", MessageKey::FileDeleted, &[]),
            l.text("en", MessageKey::FileDeleted, &[])
        );
        assert_eq!(
            l.text("not a language!", MessageKey::FileDeleted, &[]),
            "File deleted."
        );
    }

    #[test]
    fn languages_are_distinct() {
        let l = FluentLocalizer::new();
        assert_ne!(
            l.text("en", MessageKey::ProcessFinished, &[]),
            l.text("it", MessageKey::ProcessFinished, &[])
        );
    }

    #[test]
    fn supported_language_lookup() {
        let l = FluentLocalizer::new();
        assert!(l.is_supported("pt"));
        assert!(!l.is_supported("PT"));
        assert!(!l.is_supported("fr"));
        assert_eq!(l.language_label("nl"), Some("Nederlands"));
        assert!(is_language_supported("en"));
        assert!(!is_language_supported(""));
    }
}
