//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::email::DispatcherStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: TemplateHealthResponse,
    pub notifications: NotificationHealthResponse,
    pub subscriptions: SubscriptionHealthResponse,
    pub campaigns: CampaignHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct TemplateHealthResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct NotificationHealthResponse {
    pub stored: usize,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionHealthResponse {
    pub active: usize,
}

#[derive(Debug, Serialize)]
pub struct CampaignHealthResponse {
    pub tracked: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub notifications: NotificationHealthResponse,
    pub subscriptions: SubscriptionHealthResponse,
    pub campaigns: CampaignHealthResponse,
    pub emails: DispatcherStatsSnapshot,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = state.start_time.elapsed().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        templates: TemplateHealthResponse {
            count: state.catalog.count(),
        },
        notifications: NotificationHealthResponse {
            stored: state.notifications.total().await,
        },
        subscriptions: SubscriptionHealthResponse {
            active: state.subscriptions.active_count().await,
        },
        campaigns: CampaignHealthResponse {
            tracked: state.tracker.campaign_count(),
        },
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        notifications: NotificationHealthResponse {
            stored: state.notifications.total().await,
        },
        subscriptions: SubscriptionHealthResponse {
            active: state.subscriptions.active_count().await,
        },
        campaigns: CampaignHealthResponse {
            tracked: state.tracker.campaign_count(),
        },
        emails: state.email_dispatcher.stats(),
    })
}
