use std::fmt;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Platform file id, reused as the public retrieval key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileToken(pub String);

impl FileToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-user file workflow state. Only one mode is held at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileOpMode {
    #[default]
    None,
    AwaitingUpload,
    AwaitingDeleteSelection,
}

impl FileOpMode {
    /// Integer encoding used by persistent stores. `None` is stored as "no row".
    pub fn to_code(self) -> Option<i64> {
        match self {
            FileOpMode::None => None,
            FileOpMode::AwaitingUpload => Some(0),
            FileOpMode::AwaitingDeleteSelection => Some(1),
        }
    }

    /// Unknown codes decode to `None`.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => FileOpMode::AwaitingUpload,
            Some(1) => FileOpMode::AwaitingDeleteSelection,
            _ => FileOpMode::None,
        }
    }
}

/// An uploaded document registered under its platform token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub token: FileToken,
    pub owner: UserId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_are_stable() {
        for mode in [
            FileOpMode::None,
            FileOpMode::AwaitingUpload,
            FileOpMode::AwaitingDeleteSelection,
        ] {
            assert_eq!(FileOpMode::from_code(mode.to_code()), mode);
        }
        assert_eq!(FileOpMode::AwaitingUpload.to_code(), Some(0));
        assert_eq!(FileOpMode::AwaitingDeleteSelection.to_code(), Some(1));
        assert_eq!(FileOpMode::from_code(Some(7)), FileOpMode::None);
    }
}
