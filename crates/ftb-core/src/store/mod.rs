//! Persistence port for user preferences, file-operation modes and the file
//! registry.

use async_trait::async_trait;

use crate::{
    domain::{FileOpMode, FileRecord, FileToken, UserId},
    Result,
};

pub mod memory;

pub use memory::MemoryStore;

/// Store port. Infrastructure failures surface as `Error::StoreUnavailable`;
/// "not found" is a plain `false` / `None`.
#[async_trait]
pub trait BotStore: Send + Sync {
    /// `None` when the user never picked a language.
    async fn user_language(&self, user: UserId) -> Result<Option<String>>;
    async fn set_user_language(&self, user: UserId, code: &str) -> Result<()>;

    async fn user_mode(&self, user: UserId) -> Result<FileOpMode>;
    async fn set_user_mode(&self, user: UserId, mode: FileOpMode) -> Result<()>;
    async fn clear_user_mode(&self, user: UserId) -> Result<()>;

    /// Registering a token that is already known keeps the existing record.
    async fn register_file(&self, file: &FileRecord) -> Result<()>;
    async fn file_exists(&self, token: &FileToken) -> Result<bool>;
    /// True iff a record with this token owned by `owner` was removed.
    async fn delete_file(&self, token: &FileToken, owner: UserId) -> Result<bool>;
    /// The user's files in registration order.
    async fn files_by_user(&self, user: UserId) -> Result<Vec<FileRecord>>;
}
