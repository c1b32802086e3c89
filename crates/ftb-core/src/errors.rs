/// Core error type for the files bot.
///
/// Adapter crates map their specific errors into this type. User mistakes
/// (unknown language, unknown token) never show up here: the dispatcher turns
/// them into localized replies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("sender unavailable: {0}")]
    SenderUnavailable(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
