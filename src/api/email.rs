//! Email sending endpoints.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::email::{BulkSendReport, CampaignRecipient};
use crate::error::{AppError, Result};
use crate::server::AppState;

/// Email content, either direct or rendered from a catalog template
///
/// 1. Direct: `{ "subject": "...", "html": "..." }`
/// 2. Template: `{ "template_id": "...", "variables": {...} }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EmailContent {
    Template {
        template_id: String,
        #[serde(default)]
        variables: HashMap<String, String>,
    },
    Direct {
        subject: String,
        html: String,
    },
}

/// Request to send a single email
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    #[serde(flatten)]
    pub content: EmailContent,
}

/// Response for a single send
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub to: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// Request to send the same content to many recipients
#[derive(Debug, Deserialize)]
pub struct BulkEmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Request to dispatch a tracked campaign
#[derive(Debug, Deserialize)]
pub struct DispatchCampaignRequest {
    pub campaign_id: String,
    pub template_id: String,
    pub recipients: Vec<CampaignRecipient>,
}

/// Response for bulk and campaign sends
#[derive(Debug, Serialize)]
pub struct BulkSendResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub report: BulkSendReport,
}

/// Request for the welcome automation
#[derive(Debug, Deserialize)]
pub struct WelcomeRequest {
    pub email: String,
    pub nome: String,
}

/// Request for the post-session follow-up automation
#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub email: String,
    pub nome: String,
    pub tipo_ensaio: String,
}

/// Response for automation triggers
#[derive(Debug, Serialize)]
pub struct AutomationResponse {
    pub success: bool,
    pub to: String,
    pub subject: String,
}

/// POST /api/v1/email/send - Send one email (direct or templated)
#[tracing::instrument(name = "http.send_email", skip(state, request), fields(to = %request.to))]
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>> {
    if request.to.is_empty() {
        return Err(AppError::Validation("to must not be empty".to_string()));
    }

    match request.content {
        EmailContent::Template {
            template_id,
            variables,
        } => {
            let rendered = state
                .email_dispatcher
                .send_templated(&request.to, &template_id, variables)
                .await?;

            Ok(Json(SendEmailResponse {
                success: true,
                to: request.to,
                subject: rendered.subject,
                template_id: Some(rendered.template_id),
            }))
        }
        EmailContent::Direct { subject, html } => {
            state
                .email_dispatcher
                .send_direct(&request.to, &subject, &html)
                .await?;

            Ok(Json(SendEmailResponse {
                success: true,
                to: request.to,
                subject,
                template_id: None,
            }))
        }
    }
}

/// POST /api/v1/email/bulk - Same content to many recipients
#[tracing::instrument(
    name = "http.send_bulk_email",
    skip(state, request),
    fields(recipient_count = request.recipients.len())
)]
pub async fn send_bulk_email(
    State(state): State<AppState>,
    Json(request): Json<BulkEmailRequest>,
) -> Result<Json<BulkSendResponse>> {
    if request.recipients.is_empty() {
        return Err(AppError::Validation(
            "recipients must not be empty".to_string(),
        ));
    }

    let report = state
        .email_dispatcher
        .send_bulk(&request.recipients, &request.subject, &request.html)
        .await;

    Ok(Json(BulkSendResponse {
        success: report.failed == 0,
        campaign_id: None,
        report,
    }))
}

/// POST /api/v1/email/campaigns - Render per recipient, send, and track
#[tracing::instrument(
    name = "http.dispatch_campaign",
    skip(state, request),
    fields(
        campaign_id = %request.campaign_id,
        template_id = %request.template_id,
        recipient_count = request.recipients.len()
    )
)]
pub async fn dispatch_campaign(
    State(state): State<AppState>,
    Json(request): Json<DispatchCampaignRequest>,
) -> Result<Json<BulkSendResponse>> {
    if request.campaign_id.is_empty() {
        return Err(AppError::Validation(
            "campaign_id must not be empty".to_string(),
        ));
    }

    let report = state
        .email_dispatcher
        .dispatch_campaign(&request.campaign_id, &request.template_id, request.recipients)
        .await?;

    Ok(Json(BulkSendResponse {
        success: report.failed == 0,
        campaign_id: Some(request.campaign_id),
        report,
    }))
}

/// POST /api/v1/email/automations/welcome - Welcome sequence
#[tracing::instrument(name = "http.trigger_welcome", skip(state, request), fields(to = %request.email))]
pub async fn trigger_welcome(
    State(state): State<AppState>,
    Json(request): Json<WelcomeRequest>,
) -> Result<Json<AutomationResponse>> {
    let rendered = state
        .email_dispatcher
        .send_welcome(&request.email, &request.nome)
        .await?;

    Ok(Json(AutomationResponse {
        success: true,
        to: request.email,
        subject: rendered.subject,
    }))
}

/// POST /api/v1/email/automations/follow-up - Post-session follow-up
#[tracing::instrument(name = "http.trigger_follow_up", skip(state, request), fields(to = %request.email))]
pub async fn trigger_follow_up(
    State(state): State<AppState>,
    Json(request): Json<FollowUpRequest>,
) -> Result<Json<AutomationResponse>> {
    let rendered = state
        .email_dispatcher
        .send_follow_up(&request.email, &request.nome, &request.tipo_ensaio)
        .await?;

    Ok(Json(AutomationResponse {
        success: true,
        to: request.email,
        subject: rendered.subject,
    }))
}
