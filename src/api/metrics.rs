//! Prometheus metrics endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::metrics;
use crate::server::AppState;

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    update_metrics_from_state(&state).await;

    match metrics::encode_metrics() {
        Ok(output) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode Prometheus metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(axum::http::header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Update Prometheus gauges from AppState
async fn update_metrics_from_state(state: &AppState) {
    metrics::NOTIFICATIONS_STORED.set(state.notifications.total().await as i64);
    metrics::SUBSCRIPTIONS_ACTIVE.set(state.subscriptions.active_count().await as i64);
    metrics::CAMPAIGNS_TRACKED.set(state.tracker.campaign_count() as i64);
}
