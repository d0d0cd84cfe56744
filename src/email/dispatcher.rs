//! Email dispatch flows: templated sends, bulk sends, campaign dispatch,
//! and the studio's marketing automations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::analytics::CampaignTracker;
use crate::config::EmailConfig;
use crate::metrics::{CampaignMetrics, TemplateMetrics};
use crate::template::{RenderedEmail, TemplateCatalog};

use super::sender::Mailer;
use super::types::{BulkSendReport, CampaignRecipient, DispatchError, EmailResult};

/// Statistics for the email dispatcher
#[derive(Debug, Default)]
struct DispatcherStats {
    /// Emails handed to the mailer successfully
    total_sent: AtomicU64,
    /// Sends that failed (render or transport)
    total_failed: AtomicU64,
    /// Campaign dispatch batches processed
    campaigns_dispatched: AtomicU64,
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_sent: u64,
    pub total_failed: u64,
    pub campaigns_dispatched: u64,
}

/// Renders templates, sends them through the mailer, and records campaign
/// events against the tracker
pub struct EmailDispatcher {
    catalog: Arc<TemplateCatalog>,
    mailer: Arc<dyn Mailer>,
    tracker: Arc<CampaignTracker>,
    email_config: EmailConfig,
    stats: DispatcherStats,
}

impl EmailDispatcher {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        mailer: Arc<dyn Mailer>,
        tracker: Arc<CampaignTracker>,
        email_config: EmailConfig,
    ) -> Self {
        Self {
            catalog,
            mailer,
            tracker,
            email_config,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_sent: self.stats.total_sent.load(Ordering::Relaxed),
            total_failed: self.stats.total_failed.load(Ordering::Relaxed),
            campaigns_dispatched: self.stats.campaigns_dispatched.load(Ordering::Relaxed),
        }
    }

    /// Supply `unsubscribe_url` when the caller did not, derived from the
    /// recipient address and the configured public base URL
    fn with_default_variables(
        &self,
        to: &str,
        mut variables: HashMap<String, String>,
    ) -> HashMap<String, String> {
        variables
            .entry("unsubscribe_url".to_string())
            .or_insert_with(|| self.email_config.unsubscribe_url(to));
        variables
    }

    /// Render a catalog template and send it to one recipient
    #[tracing::instrument(
        name = "email.send_templated",
        skip(self, variables),
        fields(template_id = %template_id, to = %to)
    )]
    pub async fn send_templated(
        &self,
        to: &str,
        template_id: &str,
        variables: HashMap<String, String>,
    ) -> Result<RenderedEmail, DispatchError> {
        let variables = self.with_default_variables(to, variables);
        let rendered = match self.catalog.render(template_id, &variables) {
            Ok(rendered) => {
                TemplateMetrics::record_render_ok(template_id);
                rendered
            }
            Err(e) => {
                TemplateMetrics::record_render_failed(template_id);
                return Err(e.into());
            }
        };

        match self.mailer.send(to, &rendered.subject, &rendered.body).await {
            Ok(()) => {
                self.stats.total_sent.fetch_add(1, Ordering::Relaxed);
                Ok(rendered)
            }
            Err(e) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                Err(e.into())
            }
        }
    }

    /// Send pre-rendered content to one recipient
    pub async fn send_direct(&self, to: &str, subject: &str, html: &str) -> EmailResult<()> {
        match self.mailer.send(to, subject, html).await {
            Ok(()) => {
                self.stats.total_sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Send the same content to many recipients with bounded concurrency.
    /// Per-recipient failures are collected, not fatal.
    #[tracing::instrument(
        name = "email.send_bulk",
        skip(self, recipients, html),
        fields(recipient_count = recipients.len())
    )]
    pub async fn send_bulk(
        &self,
        recipients: &[String],
        subject: &str,
        html: &str,
    ) -> BulkSendReport {
        let max_concurrent = self.email_config.max_concurrent_sends.max(1);

        let results = stream::iter(recipients.iter().cloned())
            .map(|recipient| async move {
                let result = self.mailer.send(&recipient, subject, html).await;
                (recipient, result)
            })
            .buffer_unordered(max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let mut report = BulkSendReport::default();
        for (recipient, result) in results {
            match result {
                Ok(()) => report.record_success(),
                Err(e) => report.record_failure(&recipient, e),
            }
        }

        self.stats
            .total_sent
            .fetch_add(report.success as u64, Ordering::Relaxed);
        self.stats
            .total_failed
            .fetch_add(report.failed as u64, Ordering::Relaxed);

        tracing::info!(
            success = report.success,
            failed = report.failed,
            "Bulk send finished"
        );

        report
    }

    /// Dispatch a campaign: render the template per recipient, send, and
    /// record one `sent` event against the campaign for every delivered
    /// email so rate denominators reflect actual deliveries.
    ///
    /// Fails fast when the template id is unknown; per-recipient render or
    /// transport failures are reported in the batch result.
    #[tracing::instrument(
        name = "email.dispatch_campaign",
        skip(self, recipients),
        fields(
            campaign_id = %campaign_id,
            template_id = %template_id,
            recipient_count = recipients.len()
        )
    )]
    pub async fn dispatch_campaign(
        &self,
        campaign_id: &str,
        template_id: &str,
        recipients: Vec<CampaignRecipient>,
    ) -> Result<BulkSendReport, DispatchError> {
        // Surface an unknown template before any send goes out
        self.catalog.get(template_id)?;

        let max_concurrent = self.email_config.max_concurrent_sends.max(1);

        let results = stream::iter(recipients.into_iter())
            .map(|recipient| async move {
                let variables =
                    self.with_default_variables(&recipient.email, recipient.variables);

                let outcome = match self.catalog.render(template_id, &variables) {
                    Ok(rendered) => self
                        .mailer
                        .send(&recipient.email, &rendered.subject, &rendered.body)
                        .await
                        .map_err(DispatchError::from),
                    Err(e) => Err(e.into()),
                };

                (recipient.email, outcome)
            })
            .buffer_unordered(max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let mut report = BulkSendReport::default();
        for (recipient, outcome) in results {
            match outcome {
                Ok(()) => {
                    self.tracker.record_sent(campaign_id);
                    CampaignMetrics::record_sent_event();
                    report.record_success();
                }
                Err(e) => report.record_failure(&recipient, e),
            }
        }

        self.stats
            .total_sent
            .fetch_add(report.success as u64, Ordering::Relaxed);
        self.stats
            .total_failed
            .fetch_add(report.failed as u64, Ordering::Relaxed);
        self.stats.campaigns_dispatched.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            campaign_id = %campaign_id,
            success = report.success,
            failed = report.failed,
            "Campaign dispatched"
        );

        Ok(report)
    }

    /// Welcome sequence for a new subscriber
    pub async fn send_welcome(
        &self,
        to: &str,
        name: &str,
    ) -> Result<RenderedEmail, DispatchError> {
        let variables = HashMap::from([("nome".to_string(), name.to_string())]);
        self.send_templated(to, "boas_vindas", variables).await
    }

    /// Post-session follow-up for a client
    pub async fn send_follow_up(
        &self,
        to: &str,
        name: &str,
        session_type: &str,
    ) -> Result<RenderedEmail, DispatchError> {
        let variables = HashMap::from([
            ("nome".to_string(), name.to_string()),
            ("tipo_ensaio".to_string(), session_type.to_string()),
        ]);
        self.send_templated(to, "follow_up_ensaio", variables).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::sender::LogMailer;
    use crate::template::TemplateError;

    fn dispatcher() -> EmailDispatcher {
        let config = EmailConfig::default();
        EmailDispatcher::new(
            Arc::new(TemplateCatalog::builtin().unwrap()),
            Arc::new(LogMailer::new(&config).unwrap()),
            Arc::new(CampaignTracker::new()),
            config,
        )
    }

    #[tokio::test]
    async fn test_send_welcome_injects_unsubscribe_url() {
        let dispatcher = dispatcher();
        let rendered = dispatcher
            .send_welcome("ana@example.com", "Ana")
            .await
            .unwrap();

        assert!(rendered.subject.contains("Ana"));
        assert!(rendered.body.contains("unsubscribe?email=ana@example.com"));
    }

    #[tokio::test]
    async fn test_send_templated_missing_variable() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .send_templated("ana@example.com", "follow_up_ensaio", HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Template(TemplateError::MissingVariable { .. })
        ));
    }

    #[tokio::test]
    async fn test_dispatch_campaign_records_sent_per_delivery() {
        let config = EmailConfig::default();
        let tracker = Arc::new(CampaignTracker::new());
        let dispatcher = EmailDispatcher::new(
            Arc::new(TemplateCatalog::builtin().unwrap()),
            Arc::new(LogMailer::new(&config).unwrap()),
            tracker.clone(),
            config,
        );

        let recipients = vec![
            CampaignRecipient {
                email: "a@x.com".to_string(),
                variables: HashMap::from([("nome".to_string(), "A".to_string())]),
            },
            CampaignRecipient {
                email: "b@x.com".to_string(),
                variables: HashMap::from([("nome".to_string(), "B".to_string())]),
            },
            // invalid address: counted as failed, not recorded as sent
            CampaignRecipient {
                email: "broken".to_string(),
                variables: HashMap::from([("nome".to_string(), "C".to_string())]),
            },
        ];

        let report = dispatcher
            .dispatch_campaign("camp1", "boas_vindas", recipients)
            .await
            .unwrap();

        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(tracker.stats("camp1").sent_count, 2);

        let stats = dispatcher.stats();
        assert_eq!(stats.total_sent, 2);
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.campaigns_dispatched, 1);
    }

    #[tokio::test]
    async fn test_dispatch_campaign_unknown_template() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .dispatch_campaign("camp1", "nao_existe", vec![])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Template(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_send_bulk_reports_failures() {
        let dispatcher = dispatcher();
        let recipients = vec![
            "a@x.com".to_string(),
            "broken".to_string(),
            "b@x.com".to_string(),
        ];

        let report = dispatcher
            .send_bulk(&recipients, "Oi", "<p>conteúdo</p>")
            .await;

        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("broken:"));
    }
}
