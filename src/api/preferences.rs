//! Notification preference endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::notification::{NotificationPreferences, PreferencesUpdate};
use crate::server::AppState;

fn default_user() -> String {
    "admin".to_string()
}

/// Query parameters for fetching preferences
#[derive(Debug, Deserialize)]
pub struct GetPreferencesParams {
    #[serde(default = "default_user")]
    pub user_id: String,
}

/// Request to update preferences; only supplied fields change
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(flatten)]
    pub update: PreferencesUpdate,
}

/// GET /api/v1/notifications/preferences - Stored preferences or defaults
#[tracing::instrument(
    name = "http.get_preferences",
    skip(state, params),
    fields(user_id = %params.user_id)
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    Query(params): Query<GetPreferencesParams>,
) -> Json<NotificationPreferences> {
    Json(state.preferences.get(&params.user_id))
}

/// PUT /api/v1/notifications/preferences - Merge a preference update
#[tracing::instrument(
    name = "http.update_preferences",
    skip(state, request),
    fields(user_id = %request.user_id)
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Json<NotificationPreferences> {
    Json(state.preferences.update(&request.user_id, request.update))
}
