use std::sync::Arc;
use std::time::Instant;

use crate::analytics::CampaignTracker;
use crate::config::Settings;
use crate::email::{create_mailer, EmailDispatcher};
use crate::notification::{NotificationStore, PreferenceStore, SubscriptionStore};
use crate::template::TemplateCatalog;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<TemplateCatalog>,
    pub tracker: Arc<CampaignTracker>,
    pub notifications: Arc<NotificationStore>,
    pub subscriptions: Arc<SubscriptionStore>,
    pub preferences: Arc<PreferenceStore>,
    pub email_dispatcher: Arc<EmailDispatcher>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let catalog = Arc::new(TemplateCatalog::builtin()?);
        let tracker = Arc::new(CampaignTracker::new());
        let mailer = create_mailer(settings.smtp.as_ref(), &settings.email)?;
        let email_dispatcher = Arc::new(EmailDispatcher::new(
            catalog.clone(),
            mailer,
            tracker.clone(),
            settings.email.clone(),
        ));

        Ok(Self {
            settings: Arc::new(settings),
            catalog,
            tracker,
            notifications: Arc::new(NotificationStore::new()),
            subscriptions: Arc::new(SubscriptionStore::new()),
            preferences: Arc::new(PreferenceStore::new()),
            email_dispatcher,
            start_time: Instant::now(),
        })
    }
}
