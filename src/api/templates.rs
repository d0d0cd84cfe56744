//! Template catalog endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::TemplateMetrics;
use crate::server::AppState;
use crate::template::{RenderedEmail, Template};

/// Catalog entry summary for listings (no body text)
#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub variables: Vec<String>,
}

impl From<&Template> for TemplateSummary {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            subject: template.subject.clone(),
            variables: template.variables.clone(),
        }
    }
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateSummary>,
    pub total: usize,
}

/// Request to render a template
#[derive(Debug, Deserialize)]
pub struct RenderTemplateRequest {
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// GET /api/v1/templates - List the catalog in declaration order
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates: Vec<TemplateSummary> =
        state.catalog.list().iter().map(TemplateSummary::from).collect();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{id} - Get a full template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    let template = state.catalog.get(&id)?;
    Ok(Json(template.clone()))
}

/// POST /api/v1/templates/{id}/render - Render a template with variables
#[tracing::instrument(name = "http.render_template", skip(state, request))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderedEmail>> {
    match state.catalog.render(&id, &request.variables) {
        Ok(rendered) => {
            TemplateMetrics::record_render_ok(&id);
            Ok(Json(rendered))
        }
        Err(e) => {
            TemplateMetrics::record_render_failed(&id);
            Err(e.into())
        }
    }
}
