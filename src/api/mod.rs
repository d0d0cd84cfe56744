//! API layer - HTTP endpoint handlers organized by domain.

mod campaigns;
mod email;
mod health;
mod metrics;
mod notifications;
mod preferences;
mod routes;
mod subscriptions;
mod templates;

// Re-export all handlers for use in server/app.rs
pub use campaigns::{campaign_stats, record_campaign_click, record_campaign_open, record_campaign_sent};
pub use email::{dispatch_campaign, send_bulk_email, send_email, trigger_follow_up, trigger_welcome};
pub use health::{health, stats};
pub use metrics::prometheus_metrics;
pub use notifications::{
    create_notification, list_notifications, mark_all_read, mark_notification_read,
    notification_stats, send_test_notification,
};
pub use preferences::{get_preferences, update_preferences};
pub use routes::api_routes;
pub use subscriptions::{deactivate_subscription, list_subscriptions, register_subscription};
pub use templates::{get_template, list_templates, render_template};
