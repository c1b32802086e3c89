use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use crate::domain::UserId;

/// Users who were shown the language picker and have not answered yet.
///
/// Process-lifetime and unbounded; losing it on restart only drops an
/// interactive prompt.
#[derive(Debug, Default)]
pub struct PendingLanguageSelection {
    users: Mutex<HashSet<UserId>>,
}

impl PendingLanguageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, HashSet<UserId>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, user: UserId) {
        self.users().insert(user);
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.users().contains(&user)
    }

    /// Remove the user, returning whether they were pending.
    pub fn take(&self, user: UserId) -> bool {
        self.users().remove(&user)
    }

    pub fn is_empty(&self) -> bool {
        self.users().is_empty()
    }
}
