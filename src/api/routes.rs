use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::campaigns::{
    campaign_stats, record_campaign_click, record_campaign_open, record_campaign_sent,
};
use super::email::{
    dispatch_campaign, send_bulk_email, send_email, trigger_follow_up, trigger_welcome,
};
use super::health::{health, stats};
use super::metrics::prometheus_metrics;
use super::notifications::{
    create_notification, list_notifications, mark_all_read, mark_notification_read,
    notification_stats, send_test_notification,
};
use super::preferences::{get_preferences, update_preferences};
use super::subscriptions::{deactivate_subscription, list_subscriptions, register_subscription};
use super::templates::{get_template, list_templates, render_template};

pub fn api_routes(state: AppState) -> Router<AppState> {
    // Versioned API, guarded by the optional X-API-Key check
    let v1 = Router::new()
        // Notifications
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/test", post(send_test_notification))
        .route("/notifications/stats", get(notification_stats))
        .route(
            "/notifications/preferences",
            get(get_preferences).put(update_preferences),
        )
        .route(
            "/notifications/subscriptions",
            get(list_subscriptions).post(register_subscription),
        )
        .route(
            "/notifications/subscriptions/{id}",
            delete(deactivate_subscription),
        )
        .route("/notifications/{id}/read", post(mark_notification_read))
        // Template catalog
        .route("/templates", get(list_templates))
        .route("/templates/{id}", get(get_template))
        .route("/templates/{id}/render", post(render_template))
        // Campaign tracking
        .route("/campaigns/{id}/sent", post(record_campaign_sent))
        .route("/campaigns/{id}/open", post(record_campaign_open))
        .route("/campaigns/{id}/click", post(record_campaign_click))
        .route("/campaigns/{id}/stats", get(campaign_stats))
        // Email delivery
        .route("/email/send", post(send_email))
        .route("/email/bulk", post(send_bulk_email))
        .route("/email/campaigns", post(dispatch_campaign))
        .route("/email/automations/welcome", post(trigger_welcome))
        .route("/email/automations/follow-up", post(trigger_follow_up))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth));

    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api/v1", v1)
}
