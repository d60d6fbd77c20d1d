use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tracing::info;

type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// One whitelist entry per user, keyed by user ID.
fn session_key(user_id: i64) -> String {
    format!("user_token:{user_id}")
}

/// Authoritative record of the one live access token per user. A plain JWT
/// cannot be revoked before its natural expiry; the whitelist can. `put`
/// overwrites any previous entry, so a new login or refresh immediately
/// invalidates the prior session. Entry TTL mirrors the access token TTL so
/// the whitelist never outlives the token it guards.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, user_id: i64, access_token: &str, ttl_seconds: u64) -> Result<(), StoreError>;
    async fn get(&self, user_id: i64) -> Result<Option<String>, StoreError>;
    async fn delete(&self, user_id: i64) -> Result<(), StoreError>;
}

/// Redis-backed implementation used in production.
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str) -> Result<Arc<Self>, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Session whitelist connected to Redis");
        Ok(Arc::new(Self { conn }))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, user_id: i64, access_token: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(session_key(user_id), access_token, ttl_seconds).await?;
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let token: Option<String> = conn.get(session_key(user_id)).await?;
        Ok(token)
    }

    async fn delete(&self, user_id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(session_key(user_id)).await?;
        Ok(())
    }
}

struct SessionEntry {
    token: String,
    expires_at: DateTime<Utc>,
}

/// In-memory implementation for tests; expiry is checked lazily on read.
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionEntry>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    #[cfg(test)]
    fn expire_now(&self, user_id: i64) {
        if let Some(mut entry) = self.sessions.get_mut(&session_key(user_id)) {
            entry.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, user_id: i64, access_token: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        self.sessions.insert(
            session_key(user_id),
            SessionEntry {
                token: access_token.to_string(),
                expires_at: Utc::now() + Duration::seconds(ttl_seconds as i64),
            },
        );
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        let key = session_key(user_id);
        let expired = match self.sessions.get(&key) {
            Some(entry) => {
                if Utc::now() <= entry.expires_at {
                    return Ok(Some(entry.token.clone()));
                }
                true
            }
            None => false,
        };
        if expired {
            self.sessions.remove(&key);
        }
        Ok(None)
    }

    async fn delete(&self, user_id: i64) -> Result<(), StoreError> {
        self.sessions.remove(&session_key(user_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemorySessionStore::new();

        store.put(1, "token-a", 900).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), Some("token-a".to_string()));

        store.delete(1).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        store.delete(42).await.unwrap();
        store.delete(42).await.unwrap();
        assert_eq!(store.get(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_session() {
        let store = InMemorySessionStore::new();

        store.put(1, "first-login", 900).await.unwrap();
        store.put(1, "second-login", 900).await.unwrap();

        // The whitelist is the source of truth: only the latest token is live.
        assert_eq!(store.get(1).await.unwrap(), Some("second-login".to_string()));
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent() {
        let store = InMemorySessionStore::new();

        store.put(1, "token-a", 900).await.unwrap();
        store.expire_now(1);

        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = InMemorySessionStore::new();

        store.put(1, "token-a", 900).await.unwrap();
        store.put(2, "token-b", 900).await.unwrap();
        store.delete(1).await.unwrap();

        assert_eq!(store.get(1).await.unwrap(), None);
        assert_eq!(store.get(2).await.unwrap(), Some("token-b".to_string()));
    }
}
