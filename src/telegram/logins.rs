//! Running logins per chat
//!
//! A chat has at most one login in flight. `/cancel` trips that login's
//! token; the slot returned by `begin` frees the chat when it is dropped,
//! including when the login task unwinds.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::ChatId;
use tokio_util::sync::CancellationToken;

type Registry = Arc<Mutex<HashMap<ChatId, CancellationToken>>>;

#[derive(Clone, Default)]
pub struct ActiveLogins {
    running: Registry,
}

/// A chat's claim on the registry; dropping it ends the login
pub struct LoginSlot {
    chat: ChatId,
    token: CancellationToken,
    running: Registry,
}

impl LoginSlot {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for LoginSlot {
    fn drop(&mut self) {
        self.running.lock().remove(&self.chat);
    }
}

impl ActiveLogins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for a new login, or `None` while one is already running
    pub fn begin(&self, chat: ChatId) -> Option<LoginSlot> {
        let mut running = self.running.lock();
        if running.contains_key(&chat) {
            return None;
        }
        let token = CancellationToken::new();
        running.insert(chat, token.clone());
        Some(LoginSlot {
            chat,
            token,
            running: self.running.clone(),
        })
    }

    /// Cancels the chat's login; false when nothing was running
    pub fn cancel(&self, chat: ChatId) -> bool {
        match self.running.lock().get(&chat) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, chat: ChatId) -> bool {
        self.running.lock().contains_key(&chat)
    }

    pub fn len(&self) -> usize {
        self.running.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.lock().is_empty()
    }

    /// Cancels every running login, used on shutdown
    pub fn cancel_all(&self) {
        for token in self.running.lock().values() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_login_per_chat() {
        let logins = ActiveLogins::new();
        let chat = ChatId(42);

        let slot = logins.begin(chat).unwrap();
        assert!(logins.begin(chat).is_none());
        let _other = logins.begin(ChatId(7)).unwrap();
        assert_eq!(logins.len(), 2);

        assert!(logins.cancel(chat));
        assert!(slot.token().is_cancelled());
        assert!(logins.is_running(chat));

        drop(slot);
        assert!(!logins.is_running(chat));
        assert!(!logins.cancel(chat));
        assert!(logins.begin(chat).is_some());
    }

    #[test]
    fn test_cancel_all() {
        let logins = ActiveLogins::new();
        let a = logins.begin(ChatId(1)).unwrap();
        let b = logins.begin(ChatId(2)).unwrap();

        logins.cancel_all();
        assert!(a.token().is_cancelled() && b.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_panicking_login_frees_the_chat() {
        let logins = ActiveLogins::new();
        let chat = ChatId(99);
        let slot = logins.begin(chat).unwrap();

        let task = tokio::spawn(async move {
            let _slot = slot;
            panic!("formatter failure");
        });
        assert!(task.await.unwrap_err().is_panic());

        assert!(!logins.is_running(chat));
        assert!(logins.is_empty());
        assert!(logins.begin(chat).is_some());
    }
}
