//! Prometheus metrics for the notification service.
//!
//! This module provides metrics for monitoring the service:
//! - Email metrics (sent/failed by transport)
//! - Campaign metrics (sent/open/click events)
//! - Notification metrics (created by type, stored/unread gauges)
//! - Template metrics (renders by template and outcome)

mod helpers;

pub use helpers::{encode_metrics, CampaignMetrics, EmailMetrics, NotificationMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "atelier";

lazy_static! {
    // ============================================================================
    // Email Metrics
    // ============================================================================

    /// Total emails sent by transport
    pub static ref EMAILS_SENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_emails_sent_total", METRIC_PREFIX),
        "Total emails handed to the transport successfully",
        &["transport"]
    ).unwrap();

    /// Total email send failures by transport
    pub static ref EMAILS_FAILED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_emails_failed_total", METRIC_PREFIX),
        "Total email send failures",
        &["transport"]
    ).unwrap();

    // ============================================================================
    // Campaign Metrics
    // ============================================================================

    /// Campaign tracking events by kind (sent, open, click)
    pub static ref CAMPAIGN_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_campaign_events_total", METRIC_PREFIX),
        "Total campaign tracking events recorded",
        &["event"]
    ).unwrap();

    /// Campaigns with at least one recorded event
    pub static ref CAMPAIGNS_TRACKED: IntGauge = register_int_gauge!(
        format!("{}_campaigns_tracked", METRIC_PREFIX),
        "Number of campaigns with tracking records"
    ).unwrap();

    // ============================================================================
    // Notification Metrics
    // ============================================================================

    /// Notifications created by type
    pub static ref NOTIFICATIONS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_notifications_created_total", METRIC_PREFIX),
        "Total notifications created",
        &["type"]
    ).unwrap();

    /// Notifications currently stored
    pub static ref NOTIFICATIONS_STORED: IntGauge = register_int_gauge!(
        format!("{}_notifications_stored", METRIC_PREFIX),
        "Number of notifications currently stored"
    ).unwrap();

    /// Active push subscriptions
    pub static ref SUBSCRIPTIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_subscriptions_active", METRIC_PREFIX),
        "Number of active push subscriptions"
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Template renders by template id and outcome
    pub static ref TEMPLATE_RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_renders_total", METRIC_PREFIX),
        "Total template render attempts",
        &["template", "outcome"]
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics() {
        // Initialize some metrics first (lazy_static requires first access)
        NOTIFICATIONS_STORED.set(1);

        // Verify encoding doesn't panic and contains expected prefix
        let result = encode_metrics();
        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.contains("atelier_notifications_stored"));
    }

    #[test]
    fn test_counter_metrics() {
        EMAILS_SENT_TOTAL.with_label_values(&["smtp"]).inc();
        EMAILS_FAILED_TOTAL.with_label_values(&["smtp"]).inc();
        CAMPAIGN_EVENTS_TOTAL.with_label_values(&["open"]).inc();
        NOTIFICATIONS_CREATED_TOTAL.with_label_values(&["booking"]).inc();
        TEMPLATE_RENDERS_TOTAL.with_label_values(&["boas_vindas", "ok"]).inc();
        // Just verify no panics
    }

    #[test]
    fn test_gauge_metrics() {
        CAMPAIGNS_TRACKED.set(3);
        SUBSCRIPTIONS_ACTIVE.set(5);
        // Just verify no panics
    }
}
