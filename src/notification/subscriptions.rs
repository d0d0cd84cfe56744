//! Web-push subscription registry
//!
//! Registrations are stored for a future push sender; no delivery protocol
//! is implemented here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Web-push cryptographic keys supplied by the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// A registered push subscription
#[derive(Debug, Clone, Serialize)]
pub struct PushSubscription {
    pub id: Uuid,
    pub user_id: String,
    pub endpoint: String,
    pub keys: SubscriptionKeys,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_user() -> String {
    "admin".to_string()
}

/// Request to register a push subscription
#[derive(Debug, Deserialize)]
pub struct RegisterSubscriptionRequest {
    #[serde(default = "default_user")]
    pub user_id: String,
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

/// In-memory push subscription store
pub struct SubscriptionStore {
    subscriptions: RwLock<Vec<PushSubscription>>,
}

impl Default for SubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    /// Register a subscription, capturing the requesting User-Agent
    pub async fn register(
        &self,
        request: RegisterSubscriptionRequest,
        user_agent: Option<String>,
    ) -> PushSubscription {
        let subscription = PushSubscription {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            endpoint: request.endpoint,
            keys: request.keys,
            user_agent,
            active: true,
            created_at: Utc::now(),
        };

        tracing::debug!(
            subscription_id = %subscription.id,
            user_id = %subscription.user_id,
            "Push subscription registered"
        );

        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.push(subscription.clone());
        subscription
    }

    /// Active subscriptions for a user
    pub async fn list_for_user(&self, user_id: &str) -> Vec<PushSubscription> {
        let subscriptions = self.subscriptions.read().await;
        subscriptions
            .iter()
            .filter(|s| s.user_id == user_id && s.active)
            .cloned()
            .collect()
    }

    /// Deactivate a subscription. Returns None when the id is unknown.
    pub async fn deactivate(&self, id: Uuid) -> Option<PushSubscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions.iter_mut().find(|s| s.id == id)?;
        subscription.active = false;
        Some(subscription.clone())
    }

    /// Count of active subscriptions (all users)
    pub async fn active_count(&self) -> usize {
        let subscriptions = self.subscriptions.read().await;
        subscriptions.iter().filter(|s| s.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: &str) -> RegisterSubscriptionRequest {
        RegisterSubscriptionRequest {
            user_id: user_id.to_string(),
            endpoint: "https://push.example/ep".to_string(),
            keys: SubscriptionKeys {
                p256dh: "p256".to_string(),
                auth: "auth".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_register_and_list() {
        let store = SubscriptionStore::new();
        let sub = store
            .register(request("admin"), Some("Mozilla/5.0".to_string()))
            .await;

        assert!(sub.active);
        assert_eq!(sub.user_agent.as_deref(), Some("Mozilla/5.0"));

        let listed = store.list_for_user("admin").await;
        assert_eq!(listed.len(), 1);
        assert!(store.list_for_user("outro").await.is_empty());
    }

    #[tokio::test]
    async fn test_deactivate() {
        let store = SubscriptionStore::new();
        let sub = store.register(request("admin"), None).await;

        assert_eq!(store.active_count().await, 1);
        let deactivated = store.deactivate(sub.id).await.unwrap();
        assert!(!deactivated.active);
        assert_eq!(store.active_count().await, 0);
        assert!(store.list_for_user("admin").await.is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_unknown() {
        let store = SubscriptionStore::new();
        assert!(store.deactivate(Uuid::new_v4()).await.is_none());
    }
}
