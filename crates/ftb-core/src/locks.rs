use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::UserId;

/// Per-user async locks.
///
/// The outer map is only locked long enough to fetch the user's mutex, so
/// updates from different users never wait on each other.
#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock_user(&self, user: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(user)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_user_is_serialized() {
        let locks = UserLocks::new();
        let _held = locks.lock_user(UserId(1)).await;

        let second = timeout(Duration::from_millis(50), locks.lock_user(UserId(1))).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn different_users_do_not_block() {
        let locks = UserLocks::new();
        let _held = locks.lock_user(UserId(1)).await;

        let other = timeout(Duration::from_millis(50), locks.lock_user(UserId(2))).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn lock_is_released_on_drop() {
        let locks = UserLocks::new();
        drop(locks.lock_user(UserId(1)).await);

        let again = timeout(Duration::from_millis(50), locks.lock_user(UserId(1))).await;
        assert!(again.is_ok());
    }
}
