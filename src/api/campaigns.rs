//! Campaign tracking endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analytics::CampaignStats;
use crate::error::{AppError, Result};
use crate::metrics::CampaignMetrics;
use crate::server::AppState;

/// Request body for open events
#[derive(Debug, Deserialize)]
pub struct OpenEventRequest {
    pub recipient: String,
}

/// Request body for click events
#[derive(Debug, Deserialize)]
pub struct ClickEventRequest {
    pub recipient: String,
    pub url: String,
}

/// Acknowledgement for recorded tracking events
#[derive(Debug, Serialize)]
pub struct TrackEventResponse {
    pub success: bool,
    pub campaign_id: String,
}

fn ack(campaign_id: String) -> Json<TrackEventResponse> {
    Json(TrackEventResponse {
        success: true,
        campaign_id,
    })
}

/// POST /api/v1/campaigns/{id}/sent - Count one sent email for a campaign
///
/// Used by callers that deliver outside this service; campaign dispatch
/// through /email/campaigns records sends itself.
#[tracing::instrument(name = "http.record_campaign_sent", skip(state))]
pub async fn record_campaign_sent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TrackEventResponse> {
    state.tracker.record_sent(&id);
    CampaignMetrics::record_sent_event();
    ack(id)
}

/// POST /api/v1/campaigns/{id}/open - Record an open event
#[tracing::instrument(name = "http.record_campaign_open", skip(state, request))]
pub async fn record_campaign_open(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<OpenEventRequest>,
) -> Result<Json<TrackEventResponse>> {
    if request.recipient.is_empty() {
        return Err(AppError::Validation("recipient must not be empty".to_string()));
    }

    state.tracker.record_open(&id, &request.recipient);
    CampaignMetrics::record_open_event();
    Ok(ack(id))
}

/// POST /api/v1/campaigns/{id}/click - Record a click event
#[tracing::instrument(name = "http.record_campaign_click", skip(state, request))]
pub async fn record_campaign_click(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ClickEventRequest>,
) -> Result<Json<TrackEventResponse>> {
    if request.recipient.is_empty() {
        return Err(AppError::Validation("recipient must not be empty".to_string()));
    }
    if request.url.is_empty() {
        return Err(AppError::Validation("url must not be empty".to_string()));
    }

    state.tracker.record_click(&id, &request.recipient, &request.url);
    CampaignMetrics::record_click_event();
    Ok(ack(id))
}

/// GET /api/v1/campaigns/{id}/stats - Derived statistics
///
/// Unknown campaigns return all-zero stats, not 404.
#[tracing::instrument(name = "http.campaign_stats", skip(state))]
pub async fn campaign_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CampaignStats> {
    Json(state.tracker.stats(&id))
}
