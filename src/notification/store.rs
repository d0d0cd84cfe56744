//! In-memory notification storage
//!
//! Records are kept in insertion order so pagination is stable. The whole
//! list sits behind one async RwLock; per-record locking is not worth it at
//! this scale.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics::NotificationMetrics;

use super::types::{CreateNotificationRequest, Notification, NotificationStatus};

/// One page of a user's notifications
#[derive(Debug, Serialize)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    /// Total matching records before pagination
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    /// Unread records for the user, ignoring the status filter
    pub unread_count: usize,
}

/// Aggregate counts for a user's recent notifications
#[derive(Debug, Serialize)]
pub struct NotificationBreakdown {
    pub total: usize,
    pub by_type: HashMap<String, u64>,
    pub by_status: HashMap<String, u64>,
    pub by_priority: HashMap<String, u64>,
    /// ISO date (YYYY-MM-DD) -> count
    pub daily_count: HashMap<String, u64>,
}

/// In-memory notification store
pub struct NotificationStore {
    notifications: RwLock<Vec<Notification>>,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore {
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
        }
    }

    /// Create a notification
    ///
    /// Unscheduled notifications are marked sent immediately, mirroring the
    /// inline push dispatch of the ERP. Scheduled ones stay pending; no
    /// scheduler runs in this service.
    pub async fn create(&self, request: CreateNotificationRequest) -> Notification {
        let mut notification = Notification::from(request);

        if notification.scheduled_at.is_none() {
            let now = Utc::now();
            notification.status = NotificationStatus::Sent;
            notification.sent_at = Some(now);
            notification.updated_at = now;
        }

        NotificationMetrics::record_created(notification.kind.as_str());

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = notification.kind.as_str(),
            status = notification.status.as_str(),
            "Notification created"
        );

        let mut notifications = self.notifications.write().await;
        notifications.push(notification.clone());
        notification
    }

    /// Get a notification by id
    pub async fn get(&self, id: Uuid) -> Option<Notification> {
        let notifications = self.notifications.read().await;
        notifications.iter().find(|n| n.id == id).cloned()
    }

    /// List a user's notifications, newest first, with optional status
    /// filter and 1-based pagination
    pub async fn list(
        &self,
        user_id: &str,
        page: usize,
        limit: usize,
        status: Option<NotificationStatus>,
    ) -> NotificationPage {
        let notifications = self.notifications.read().await;

        let unread_count = notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .count();

        let mut matching: Vec<&Notification> = notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| status.map_or(true, |s| n.status == s))
            .collect();
        matching.reverse();

        let total = matching.len();
        let page = page.max(1);
        let limit = limit.max(1);
        let start = (page - 1) * limit;

        let items = if start >= total {
            Vec::new()
        } else {
            matching[start..(start + limit).min(total)]
                .iter()
                .map(|n| (*n).clone())
                .collect()
        };

        NotificationPage {
            notifications: items,
            total,
            page,
            limit,
            unread_count,
        }
    }

    /// Mark one notification as read. Returns None when the id is unknown.
    pub async fn mark_read(&self, id: Uuid) -> Option<Notification> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications.iter_mut().find(|n| n.id == id)?;

        let now = Utc::now();
        notification.status = NotificationStatus::Read;
        notification.read_at = Some(now);
        notification.updated_at = now;

        Some(notification.clone())
    }

    /// Mark every unread notification of a user as read; returns how many
    /// transitioned
    pub async fn mark_all_read(&self, user_id: &str) -> usize {
        let mut notifications = self.notifications.write().await;
        let now = Utc::now();
        let mut count = 0;

        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && n.is_unread())
        {
            notification.status = NotificationStatus::Read;
            notification.read_at = Some(now);
            notification.updated_at = now;
            count += 1;
        }

        count
    }

    /// Aggregate counts for a user over the trailing `days` window
    pub async fn breakdown(&self, user_id: &str, days: i64) -> NotificationBreakdown {
        let cutoff = Utc::now() - Duration::days(days);
        let notifications = self.notifications.read().await;

        let mut breakdown = NotificationBreakdown {
            total: 0,
            by_type: HashMap::new(),
            by_status: HashMap::new(),
            by_priority: HashMap::new(),
            daily_count: HashMap::new(),
        };

        for notification in notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.created_at > cutoff)
        {
            breakdown.total += 1;
            *breakdown
                .by_type
                .entry(notification.kind.as_str().to_string())
                .or_insert(0) += 1;
            *breakdown
                .by_status
                .entry(notification.status.as_str().to_string())
                .or_insert(0) += 1;
            *breakdown
                .by_priority
                .entry(notification.priority.as_str().to_string())
                .or_insert(0) += 1;
            *breakdown
                .daily_count
                .entry(notification.created_at.format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }

        breakdown
    }

    /// Total stored notifications (all users)
    pub async fn total(&self) -> usize {
        self.notifications.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::types::{NotificationType, Priority};

    fn request(user_id: &str, title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            user_id: user_id.to_string(),
            title: title.to_string(),
            message: "mensagem".to_string(),
            kind: NotificationType::Booking,
            priority: Priority::High,
            data: serde_json::Value::Null,
            action_url: None,
            icon: None,
            image_url: None,
            scheduled_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_marks_sent_immediately() {
        let store = NotificationStore::new();
        let created = store.create(request("admin", "Novo Agendamento")).await;

        assert_eq!(created.status, NotificationStatus::Sent);
        assert!(created.sent_at.is_some());
    }

    #[tokio::test]
    async fn test_scheduled_stays_pending() {
        let store = NotificationStore::new();
        let mut req = request("admin", "Lembrete");
        req.scheduled_at = Some(Utc::now() + Duration::hours(2));

        let created = store.create(req).await;
        assert_eq!(created.status, NotificationStatus::Pending);
        assert!(created.sent_at.is_none());
    }

    #[tokio::test]
    async fn test_list_pagination_and_filter() {
        let store = NotificationStore::new();
        for i in 0..25 {
            store.create(request("admin", &format!("n{}", i))).await;
        }
        store.create(request("outro", "other-user")).await;

        let page = store.list("admin", 1, 20, None).await;
        assert_eq!(page.notifications.len(), 20);
        assert_eq!(page.total, 25);
        assert_eq!(page.unread_count, 25);
        // newest first
        assert_eq!(page.notifications[0].title, "n24");

        let page2 = store.list("admin", 2, 20, None).await;
        assert_eq!(page2.notifications.len(), 5);

        let read_only = store
            .list("admin", 1, 20, Some(NotificationStatus::Read))
            .await;
        assert_eq!(read_only.total, 0);
    }

    #[tokio::test]
    async fn test_mark_read_and_mark_all() {
        let store = NotificationStore::new();
        let first = store.create(request("admin", "a")).await;
        store.create(request("admin", "b")).await;
        store.create(request("outro", "c")).await;

        let marked = store.mark_read(first.id).await.unwrap();
        assert_eq!(marked.status, NotificationStatus::Read);
        assert!(marked.read_at.is_some());

        // only the remaining unread one for admin transitions
        let count = store.mark_all_read("admin").await;
        assert_eq!(count, 1);

        let page = store.list("admin", 1, 20, None).await;
        assert_eq!(page.unread_count, 0);

        // other user untouched
        let other = store.list("outro", 1, 20, None).await;
        assert_eq!(other.unread_count, 1);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_id() {
        let store = NotificationStore::new();
        assert!(store.mark_read(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_breakdown() {
        let store = NotificationStore::new();
        store.create(request("admin", "a")).await;
        store.create(request("admin", "b")).await;

        let mut payment = request("admin", "c");
        payment.kind = NotificationType::Payment;
        payment.priority = Priority::Normal;
        store.create(payment).await;

        let breakdown = store.breakdown("admin", 7).await;
        assert_eq!(breakdown.total, 3);
        assert_eq!(breakdown.by_type.get("booking"), Some(&2));
        assert_eq!(breakdown.by_type.get("payment"), Some(&1));
        assert_eq!(breakdown.by_status.get("sent"), Some(&3));
        assert_eq!(breakdown.by_priority.get("high"), Some(&2));
        assert_eq!(breakdown.daily_count.len(), 1);
    }
}
