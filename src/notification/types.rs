use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification categories used by the studio ERP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// New or changed booking
    Booking,
    /// Payment received or approved
    Payment,
    /// Photo session reminders and gallery updates
    Session,
    /// Service/system messages (default)
    #[default]
    System,
    /// Marketing campaigns
    Marketing,
    /// Incoming WhatsApp messages
    Whatsapp,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Booking => "booking",
            NotificationType::Payment => "payment",
            NotificationType::Session => "session",
            NotificationType::System => "system",
            NotificationType::Marketing => "marketing",
            NotificationType::Whatsapp => "whatsapp",
        }
    }
}

/// Priority levels for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority, can be delayed
    Low,
    /// Normal priority (default)
    #[default]
    Normal,
    /// High priority, should be surfaced promptly
    High,
    /// Urgent, immediate attention required
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Get numeric value for priority comparison
    pub fn as_weight(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Normal => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_weight().cmp(&other.as_weight())
    }
}

/// Delivery/read status of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Created but not yet delivered (scheduled notifications stay here)
    #[default]
    Pending,
    /// Delivered to the user's devices
    Sent,
    /// Read by the user
    Read,
    /// Delivery failed
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Read => "read",
            NotificationStatus::Failed => "failed",
        }
    }
}

/// An in-app notification record
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
    pub status: NotificationStatus,
    /// Free-form payload for the client (deep links, entity ids)
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Unread = surfaced to the user but not yet read
    pub fn is_unread(&self) -> bool {
        matches!(
            self.status,
            NotificationStatus::Pending | NotificationStatus::Sent
        )
    }
}

fn default_user() -> String {
    "admin".to_string()
}

/// Request to create a notification
#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(default = "default_user")]
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub data: serde_json::Value,
    pub action_url: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    /// When set, the notification is held as pending instead of being
    /// marked sent immediately
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<CreateNotificationRequest> for Notification {
    fn from(req: CreateNotificationRequest) -> Self {
        let now = Utc::now();
        Notification {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            title: req.title,
            message: req.message,
            kind: req.kind,
            priority: req.priority,
            status: NotificationStatus::Pending,
            data: req.data,
            action_url: req.action_url,
            icon: req.icon,
            image_url: req.image_url,
            scheduled_at: req.scheduled_at,
            sent_at: None,
            read_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
