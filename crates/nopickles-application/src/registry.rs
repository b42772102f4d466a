//! Process-wide session registry.

use nopickles_core::order::OrderSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// In-memory mapping from session id to its [`OrderSession`].
///
/// Sessions are created on first reference and never evicted within the
/// process lifetime (documented non-goal). Each session sits behind its own
/// `Mutex` so concurrent requests for the same id are serialized while
/// requests for different ids proceed in parallel. The registry is an
/// owned object injected where it is needed, not an ambient singleton.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<OrderSession>>>>>,
}

impl SessionRegistry {
    /// Creates a new empty SessionRegistry.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets the session for `session_id`, creating a fresh Greeting-stage
    /// session on first reference.
    ///
    /// Creation is double-checked under the write lock so two concurrent
    /// first references observe the same single session.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<OrderSession>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(session_id) {
                return session.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(OrderSession::new(session_id))))
            .clone()
    }

    /// Gets an existing session by id.
    ///
    /// # Returns
    ///
    /// `Some(session)` if the session exists, `None` otherwise.
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<OrderSession>>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Returns all known session ids.
    pub async fn list_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        sessions.keys().cloned().collect()
    }

    /// Number of sessions currently registered.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_on_first_use() {
        let registry = SessionRegistry::new();
        assert!(registry.get("kiosk-1").await.is_none());

        let session = registry.get_or_create("kiosk-1").await;
        assert_eq!(session.lock().await.id, "kiosk-1");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_same_id_returns_same_session() {
        let registry = SessionRegistry::new();
        let first = registry.get_or_create("kiosk-1").await;
        let second = registry.get_or_create("kiosk-1").await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_references_create_one_session() {
        let registry = Arc::new(SessionRegistry::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.get_or_create("shared").await
            }));
        }

        let mut sessions = Vec::new();
        for handle in handles {
            sessions.push(handle.await.unwrap());
        }

        assert_eq!(registry.len().await, 1);
        for session in &sessions[1..] {
            assert!(Arc::ptr_eq(&sessions[0], session));
        }
    }
}
