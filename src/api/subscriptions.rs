//! Push subscription endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::notification::{PushSubscription, RegisterSubscriptionRequest};
use crate::server::AppState;

fn default_user() -> String {
    "admin".to_string()
}

/// Query parameters for listing subscriptions
#[derive(Debug, Deserialize)]
pub struct ListSubscriptionsParams {
    #[serde(default = "default_user")]
    pub user_id: String,
}

/// Response for subscription registration
#[derive(Debug, Serialize)]
pub struct RegisterSubscriptionResponse {
    pub success: bool,
    pub subscription: PushSubscription,
}

/// Response for listing subscriptions
#[derive(Debug, Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<PushSubscription>,
    pub total: usize,
}

/// POST /api/v1/notifications/subscriptions - Register a push subscription
#[tracing::instrument(
    name = "http.register_subscription",
    skip(state, headers, request),
    fields(user_id = %request.user_id)
)]
pub async fn register_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterSubscriptionRequest>,
) -> Result<(StatusCode, Json<RegisterSubscriptionResponse>)> {
    if request.endpoint.is_empty() {
        return Err(AppError::Validation("endpoint must not be empty".to_string()));
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let subscription = state.subscriptions.register(request, user_agent).await;

    Ok((
        StatusCode::CREATED,
        Json(RegisterSubscriptionResponse {
            success: true,
            subscription,
        }),
    ))
}

/// DELETE /api/v1/notifications/subscriptions/{id} - Deactivate a subscription
#[tracing::instrument(name = "http.deactivate_subscription", skip(state))]
pub async fn deactivate_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegisterSubscriptionResponse>> {
    let subscription = state
        .subscriptions
        .deactivate(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("subscription {}", id)))?;

    Ok(Json(RegisterSubscriptionResponse {
        success: true,
        subscription,
    }))
}

/// GET /api/v1/notifications/subscriptions - Active subscriptions for a user
#[tracing::instrument(
    name = "http.list_subscriptions",
    skip(state, params),
    fields(user_id = %params.user_id)
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(params): Query<ListSubscriptionsParams>,
) -> Json<SubscriptionListResponse> {
    let subscriptions = state.subscriptions.list_for_user(&params.user_id).await;
    let total = subscriptions.len();

    Json(SubscriptionListResponse {
        subscriptions,
        total,
    })
}
