//! Notification CRUD endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::notification::{
    CreateNotificationRequest, Notification, NotificationStatus, NotificationType, Priority,
};
use crate::server::AppState;

fn default_user() -> String {
    "admin".to_string()
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

fn default_days() -> i64 {
    7
}

/// Query parameters for listing notifications
#[derive(Debug, Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Omit for all statuses
    pub status: Option<NotificationStatus>,
}

/// Query parameters for notification statistics
#[derive(Debug, Deserialize)]
pub struct NotificationStatsParams {
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default = "default_days")]
    pub days: i64,
}

/// Request to mark all of a user's notifications read
#[derive(Debug, Deserialize)]
pub struct MarkAllReadRequest {
    #[serde(default = "default_user")]
    pub user_id: String,
}

/// Response for mark-all-read
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub success: bool,
    /// Notifications that transitioned to read
    pub marked: usize,
}

/// Request for a test notification
#[derive(Debug, Deserialize)]
pub struct TestNotificationRequest {
    #[serde(default = "default_user")]
    pub user_id: String,
}

/// GET /api/v1/notifications - List a user's notifications
#[tracing::instrument(
    name = "http.list_notifications",
    skip(state, params),
    fields(user_id = %params.user_id)
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<ListNotificationsParams>,
) -> Json<crate::notification::NotificationPage> {
    let page = state
        .notifications
        .list(&params.user_id, params.page, params.limit, params.status)
        .await;

    Json(page)
}

/// POST /api/v1/notifications - Create a notification
#[tracing::instrument(
    name = "http.create_notification",
    skip(state, request),
    fields(user_id = %request.user_id)
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>)> {
    if request.title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if request.message.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let notification = state.notifications.create(request).await;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// POST /api/v1/notifications/{id}/read - Mark one notification as read
#[tracing::instrument(name = "http.mark_notification_read", skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>> {
    state
        .notifications
        .mark_read(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("notification {}", id)))
}

/// POST /api/v1/notifications/read-all - Mark all of a user's unread
/// notifications as read
#[tracing::instrument(
    name = "http.mark_all_read",
    skip(state, request),
    fields(user_id = %request.user_id)
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Json(request): Json<MarkAllReadRequest>,
) -> Json<MarkAllReadResponse> {
    let marked = state.notifications.mark_all_read(&request.user_id).await;

    Json(MarkAllReadResponse {
        success: true,
        marked,
    })
}

/// GET /api/v1/notifications/stats - Per-user aggregate counts
#[tracing::instrument(
    name = "http.notification_stats",
    skip(state, params),
    fields(user_id = %params.user_id, days = params.days)
)]
pub async fn notification_stats(
    State(state): State<AppState>,
    Query(params): Query<NotificationStatsParams>,
) -> Json<crate::notification::NotificationBreakdown> {
    let breakdown = state
        .notifications
        .breakdown(&params.user_id, params.days.max(0))
        .await;

    Json(breakdown)
}

/// POST /api/v1/notifications/test - Create a canned test notification
#[tracing::instrument(name = "http.send_test_notification", skip(state, request))]
pub async fn send_test_notification(
    State(state): State<AppState>,
    Json(request): Json<TestNotificationRequest>,
) -> Json<Notification> {
    let notification = state
        .notifications
        .create(CreateNotificationRequest {
            user_id: request.user_id,
            title: "Notificação de Teste".to_string(),
            message: "Esta é uma notificação de teste do sistema Atelier".to_string(),
            kind: NotificationType::System,
            priority: Priority::Normal,
            data: serde_json::Value::Null,
            action_url: Some("/dashboard".to_string()),
            icon: Some("/icons/test-icon.png".to_string()),
            image_url: None,
            scheduled_at: None,
        })
        .await;

    Json(notification)
}
