//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    CAMPAIGN_EVENTS_TOTAL, EMAILS_FAILED_TOTAL, EMAILS_SENT_TOTAL, NOTIFICATIONS_CREATED_TOTAL,
    TEMPLATE_RENDERS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording email metrics
pub struct EmailMetrics;

impl EmailMetrics {
    /// Record a successful send
    pub fn record_sent(transport: &str) {
        EMAILS_SENT_TOTAL.with_label_values(&[transport]).inc();
    }

    /// Record a failed send
    pub fn record_failed(transport: &str) {
        EMAILS_FAILED_TOTAL.with_label_values(&[transport]).inc();
    }
}

/// Helper struct for recording campaign tracking metrics
pub struct CampaignMetrics;

impl CampaignMetrics {
    pub fn record_sent_event() {
        CAMPAIGN_EVENTS_TOTAL.with_label_values(&["sent"]).inc();
    }

    pub fn record_open_event() {
        CAMPAIGN_EVENTS_TOTAL.with_label_values(&["open"]).inc();
    }

    pub fn record_click_event() {
        CAMPAIGN_EVENTS_TOTAL.with_label_values(&["click"]).inc();
    }
}

/// Helper struct for recording notification metrics
pub struct NotificationMetrics;

impl NotificationMetrics {
    /// Record a created notification
    pub fn record_created(kind: &str) {
        NOTIFICATIONS_CREATED_TOTAL.with_label_values(&[kind]).inc();
    }
}

/// Helper struct for recording template render metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    pub fn record_render_ok(template_id: &str) {
        TEMPLATE_RENDERS_TOTAL
            .with_label_values(&[template_id, "ok"])
            .inc();
    }

    pub fn record_render_failed(template_id: &str) {
        TEMPLATE_RENDERS_TOTAL
            .with_label_values(&[template_id, "error"])
            .inc();
    }
}
