//! Session context: which user the app is currently acting for.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::domain::models::User;
use crate::storage::UserStorage;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Observable pointer to the current session user.
///
/// Cloning shares the same underlying value. [`SessionContext::assign`] is the
/// only way to change it; screens observe changes through `subscribe`.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<watch::Sender<Option<SessionUser>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            current: Arc::new(sender),
        }
    }

    /// Build a session from the active user persisted in storage
    pub async fn load(users: &dyn UserStorage) -> Result<Self> {
        let session = Self::new();
        if let Some(user_id) = users.get_active_user().await? {
            if let Some(user) = users.get_user(user_id).await? {
                info!("Resuming session for user {} ({})", user.name, user.id);
                session.assign(SessionUser::from(&user));
            }
        }
        Ok(session)
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.current.subscribe()
    }

    pub fn assign(&self, user: SessionUser) {
        info!("Session user is now {} ({})", user.name, user.id);
        self.current.send_replace(Some(user));
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_assign_notifies_subscribers() {
        let session = SessionContext::new();
        let mut receiver = session.subscribe();
        assert_eq!(session.current(), None);

        session.assign(SessionUser { id: 3, name: "Ana".to_string() });

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().as_ref().map(|u| u.id), Some(3));
        assert_eq!(session.clone().current().map(|u| u.name), Some("Ana".to_string()));
    }
}
