//! In-app notification records, per-user preferences, and web-push
//! subscription registry.

mod preferences;
mod store;
mod subscriptions;
mod types;

pub use preferences::{NotificationPreferences, PreferenceStore, PreferencesUpdate};
pub use store::{NotificationBreakdown, NotificationPage, NotificationStore};
pub use subscriptions::{
    PushSubscription, RegisterSubscriptionRequest, SubscriptionKeys, SubscriptionStore,
};
pub use types::{
    CreateNotificationRequest, Notification, NotificationStatus, NotificationType, Priority,
};
