use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{FileOpMode, FileRecord, FileToken, UserId},
    store::BotStore,
    Result,
};

#[derive(Debug, Default)]
struct Tables {
    languages: HashMap<UserId, String>,
    modes: HashMap<UserId, FileOpMode>,
    files: Vec<FileRecord>,
}

/// In-process store. Used by tests and by `DATABASE_URL=memory`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn file_count(&self) -> usize {
        self.tables.lock().await.files.len()
    }
}

#[async_trait]
impl BotStore for MemoryStore {
    async fn user_language(&self, user: UserId) -> Result<Option<String>> {
        Ok(self.tables.lock().await.languages.get(&user).cloned())
    }

    async fn set_user_language(&self, user: UserId, code: &str) -> Result<()> {
        self.tables
            .lock()
            .await
            .languages
            .insert(user, code.to_string());
        Ok(())
    }

    async fn user_mode(&self, user: UserId) -> Result<FileOpMode> {
        Ok(self
            .tables
            .lock()
            .await
            .modes
            .get(&user)
            .copied()
            .unwrap_or_default())
    }

    async fn set_user_mode(&self, user: UserId, mode: FileOpMode) -> Result<()> {
        let mut t = self.tables.lock().await;
        if mode == FileOpMode::None {
            t.modes.remove(&user);
        } else {
            t.modes.insert(user, mode);
        }
        Ok(())
    }

    async fn clear_user_mode(&self, user: UserId) -> Result<()> {
        self.tables.lock().await.modes.remove(&user);
        Ok(())
    }

    async fn register_file(&self, file: &FileRecord) -> Result<()> {
        let mut t = self.tables.lock().await;
        if !t.files.iter().any(|f| f.token == file.token) {
            t.files.push(file.clone());
        }
        Ok(())
    }

    async fn file_exists(&self, token: &FileToken) -> Result<bool> {
        Ok(self
            .tables
            .lock()
            .await
            .files
            .iter()
            .any(|f| &f.token == token))
    }

    async fn delete_file(&self, token: &FileToken, owner: UserId) -> Result<bool> {
        let mut t = self.tables.lock().await;
        let before = t.files.len();
        t.files.retain(|f| !(&f.token == token && f.owner == owner));
        Ok(t.files.len() != before)
    }

    async fn files_by_user(&self, user: UserId) -> Result<Vec<FileRecord>> {
        Ok(self
            .tables
            .lock()
            .await
            .files
            .iter()
            .filter(|f| f.owner == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(token: &str, owner: i64, name: &str) -> FileRecord {
        FileRecord {
            token: FileToken::new(token),
            owner: UserId(owner),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn language_defaults_to_none_and_overwrites() {
        let s = MemoryStore::new();
        assert_eq!(s.user_language(UserId(1)).await.unwrap(), None);

        s.set_user_language(UserId(1), "es").await.unwrap();
        s.set_user_language(UserId(1), "it").await.unwrap();
        assert_eq!(
            s.user_language(UserId(1)).await.unwrap().as_deref(),
            Some("it")
        );
    }

    #[tokio::test]
    async fn mode_set_and_clear() {
        let s = MemoryStore::new();
        assert_eq!(s.user_mode(UserId(1)).await.unwrap(), FileOpMode::None);

        s.set_user_mode(UserId(1), FileOpMode::AwaitingUpload)
            .await
            .unwrap();
        s.set_user_mode(UserId(1), FileOpMode::AwaitingDeleteSelection)
            .await
            .unwrap();
        assert_eq!(
            s.user_mode(UserId(1)).await.unwrap(),
            FileOpMode::AwaitingDeleteSelection
        );

        s.clear_user_mode(UserId(1)).await.unwrap();
        assert_eq!(s.user_mode(UserId(1)).await.unwrap(), FileOpMode::None);
    }

    #[tokio::test]
    async fn files_are_listed_per_owner_in_order() {
        let s = MemoryStore::new();
        s.register_file(&record("a", 1, "a.txt")).await.unwrap();
        s.register_file(&record("b", 2, "b.txt")).await.unwrap();
        s.register_file(&record("c", 1, "c.txt")).await.unwrap();
        s.register_file(&record("a", 2, "dup.txt")).await.unwrap();

        let mine = s.files_by_user(UserId(1)).await.unwrap();
        assert_eq!(mine, vec![record("a", 1, "a.txt"), record("c", 1, "c.txt")]);
        assert_eq!(s.file_count().await, 3);
    }

    #[tokio::test]
    async fn delete_requires_owner() {
        let s = MemoryStore::new();
        s.register_file(&record("a", 1, "a.txt")).await.unwrap();

        assert!(!s.delete_file(&FileToken::new("a"), UserId(2)).await.unwrap());
        assert!(s.file_exists(&FileToken::new("a")).await.unwrap());

        assert!(s.delete_file(&FileToken::new("a"), UserId(1)).await.unwrap());
        assert!(!s.file_exists(&FileToken::new("a")).await.unwrap());
        assert!(!s.delete_file(&FileToken::new("a"), UserId(1)).await.unwrap());
    }
}
