//! Cross-component integration tests
//!
//! These tests verify interactions between the template catalog, campaign
//! tracker, email dispatcher, and notification stores without starting a
//! server or touching a real SMTP relay (the log-only mailer stands in for
//! the transport).

use std::collections::HashMap;
use std::sync::Arc;

use atelier_notification_service::analytics::CampaignTracker;
use atelier_notification_service::config::EmailConfig;
use atelier_notification_service::email::{
    CampaignRecipient, DispatchError, EmailDispatcher, LogMailer,
};
use atelier_notification_service::notification::{
    CreateNotificationRequest, NotificationStatus, NotificationStore, NotificationType,
    PreferenceStore, PreferencesUpdate, Priority, RegisterSubscriptionRequest, SubscriptionKeys,
    SubscriptionStore,
};
use atelier_notification_service::template::{TemplateCatalog, TemplateError};

/// Create a full test environment with all components
fn create_full_test_environment() -> TestEnvironment {
    let email_config = EmailConfig::default();

    let catalog = Arc::new(TemplateCatalog::builtin().unwrap());
    let tracker = Arc::new(CampaignTracker::new());
    let mailer = Arc::new(LogMailer::new(&email_config).unwrap());

    let dispatcher = Arc::new(EmailDispatcher::new(
        catalog.clone(),
        mailer,
        tracker.clone(),
        email_config,
    ));

    TestEnvironment {
        catalog,
        tracker,
        dispatcher,
        notifications: Arc::new(NotificationStore::new()),
        subscriptions: Arc::new(SubscriptionStore::new()),
        preferences: Arc::new(PreferenceStore::new()),
    }
}

struct TestEnvironment {
    catalog: Arc<TemplateCatalog>,
    tracker: Arc<CampaignTracker>,
    dispatcher: Arc<EmailDispatcher>,
    notifications: Arc<NotificationStore>,
    subscriptions: Arc<SubscriptionStore>,
    preferences: Arc<PreferenceStore>,
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Template Rendering
// =============================================================================

#[test]
fn every_catalog_template_renders_without_leftover_tokens() {
    let env = create_full_test_environment();

    for template in env.catalog.list() {
        let values: HashMap<String, String> = template
            .placeholders()
            .into_iter()
            .map(|p| (p, "valor".to_string()))
            .collect();

        let rendered = env.catalog.render(&template.id, &values).unwrap();
        assert!(
            !rendered.subject.contains('{') && !rendered.body.contains('{'),
            "unsubstituted token left in '{}'",
            template.id
        );
    }
}

#[test]
fn missing_variable_yields_no_partial_result() {
    let env = create_full_test_environment();

    // newsletter_mensal needs eight variables; supply all but one
    let template = env.catalog.get("newsletter_mensal").unwrap();
    let mut values: HashMap<String, String> = template
        .placeholders()
        .into_iter()
        .map(|p| (p, "valor".to_string()))
        .collect();
    values.remove("dica_fotografia");

    let err = env.catalog.render("newsletter_mensal", &values).unwrap_err();
    match err {
        TemplateError::MissingVariable { template, variable } => {
            assert_eq!(template, "newsletter_mensal");
            assert_eq!(variable, "dica_fotografia");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_template_fails_for_any_variables() {
    let env = create_full_test_environment();

    for values in [vars(&[]), vars(&[("nome", "Ana")])] {
        let err = env.catalog.render("inexistente", &values).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }
}

#[test]
fn welcome_template_substitutes_name() {
    let env = create_full_test_environment();

    let rendered = env
        .catalog
        .render(
            "boas_vindas",
            &vars(&[("nome", "Ana"), ("unsubscribe_url", "https://x/u")]),
        )
        .unwrap();

    assert!(rendered.subject.contains("Ana"));
    assert!(!rendered.subject.contains("{nome}"));
    assert!(!rendered.body.contains("{nome}"));
}

// =============================================================================
// Campaign Analytics
// =============================================================================

#[test]
fn zero_sends_means_zero_rates() {
    let env = create_full_test_environment();

    env.tracker.record_open("camp", "a@x.com");
    env.tracker.record_open("camp", "b@x.com");
    env.tracker.record_click("camp", "a@x.com", "/p");

    let stats = env.tracker.stats("camp");
    assert_eq!(stats.open_rate, 0.0);
    assert_eq!(stats.click_rate, 0.0);
}

#[test]
fn repeated_opens_count_raw_but_unique_once() {
    let env = create_full_test_environment();

    for _ in 0..4 {
        env.tracker.record_open("camp", "a@x.com");
    }

    let stats = env.tracker.stats("camp");
    assert_eq!(stats.open_count, 4);
    assert_eq!(stats.unique_opens, 1);
}

#[test]
fn open_and_click_rates_follow_unique_counts() {
    let env = create_full_test_environment();

    for _ in 0..10 {
        env.tracker.record_sent("camp1");
    }
    env.tracker.record_open("camp1", "a@x.com");
    env.tracker.record_open("camp1", "a@x.com");
    env.tracker.record_open("camp1", "b@x.com");

    let stats = env.tracker.stats("camp1");
    assert_eq!(stats.sent_count, 10);
    assert_eq!(stats.open_count, 3);
    assert_eq!(stats.unique_opens, 2);
    assert_eq!(stats.open_rate, 20.0);

    env.tracker.record_click("camp1", "a@x.com", "/url1");

    let stats = env.tracker.stats("camp1");
    assert_eq!(stats.unique_clicks, 1);
    assert_eq!(stats.click_to_open_rate, 50.0);
}

// =============================================================================
// Campaign Dispatch (renderer -> mailer -> tracker)
// =============================================================================

#[tokio::test]
async fn campaign_dispatch_feeds_tracker_per_delivery() {
    let env = create_full_test_environment();

    let recipients = vec![
        CampaignRecipient {
            email: "a@x.com".to_string(),
            variables: vars(&[("nome", "Ana")]),
        },
        CampaignRecipient {
            email: "b@x.com".to_string(),
            variables: vars(&[("nome", "Bia")]),
        },
    ];

    let report = env
        .dispatcher
        .dispatch_campaign("junho", "boas_vindas", recipients)
        .await
        .unwrap();

    assert_eq!(report.success, 2);
    assert_eq!(report.failed, 0);

    let stats = env.tracker.stats("junho");
    assert_eq!(stats.sent_count, 2);

    // tracking continues after delivery
    env.tracker.record_open("junho", "a@x.com");
    let stats = env.tracker.stats("junho");
    assert_eq!(stats.open_rate, 50.0);
}

#[tokio::test]
async fn campaign_dispatch_reports_bad_recipients_without_aborting() {
    let env = create_full_test_environment();

    let recipients = vec![
        CampaignRecipient {
            email: "a@x.com".to_string(),
            variables: vars(&[("nome", "Ana")]),
        },
        // no 'nome': the render fails for this recipient only
        CampaignRecipient {
            email: "b@x.com".to_string(),
            variables: vars(&[]),
        },
        // unparseable address: the transport rejects it
        CampaignRecipient {
            email: "quebrado".to_string(),
            variables: vars(&[("nome", "Caio")]),
        },
    ];

    let report = env
        .dispatcher
        .dispatch_campaign("julho", "boas_vindas", recipients)
        .await
        .unwrap();

    assert_eq!(report.success, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.errors.len(), 2);
    assert_eq!(env.tracker.stats("julho").sent_count, 1);
}

#[tokio::test]
async fn welcome_automation_renders_and_sends() {
    let env = create_full_test_environment();

    let rendered = env
        .dispatcher
        .send_welcome("ana@example.com", "Ana")
        .await
        .unwrap();

    assert_eq!(rendered.template_id, "boas_vindas");
    assert!(rendered.subject.contains("Ana"));
    assert!(rendered.body.contains("ana@example.com"));

    let stats = env.dispatcher.stats();
    assert_eq!(stats.total_sent, 1);
    assert_eq!(stats.total_failed, 0);
}

#[tokio::test]
async fn follow_up_automation_requires_session_type() {
    let env = create_full_test_environment();

    let rendered = env
        .dispatcher
        .send_follow_up("ana@example.com", "Ana", "Gestante")
        .await
        .unwrap();
    assert!(rendered.body.contains("Gestante"));

    // direct templated send without tipo_ensaio fails cleanly
    let err = env
        .dispatcher
        .send_templated("ana@example.com", "follow_up_ensaio", vars(&[("nome", "Ana")]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Template(TemplateError::MissingVariable { .. })
    ));
}

// =============================================================================
// Notifications, Preferences, Subscriptions
// =============================================================================

#[tokio::test]
async fn notification_lifecycle() {
    let env = create_full_test_environment();

    let created = env
        .notifications
        .create(CreateNotificationRequest {
            user_id: "admin".to_string(),
            title: "Novo Agendamento - Ana Silva".to_string(),
            message: "Ensaio Gestante em 20/06 às 14:00".to_string(),
            kind: NotificationType::Booking,
            priority: Priority::High,
            data: serde_json::json!({"booking_id": "bk-1"}),
            action_url: Some("/dashboard/agendamentos".to_string()),
            icon: None,
            image_url: None,
            scheduled_at: None,
        })
        .await;

    assert_eq!(created.status, NotificationStatus::Sent);

    let page = env.notifications.list("admin", 1, 20, None).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.unread_count, 1);

    let marked = env.notifications.mark_read(created.id).await.unwrap();
    assert_eq!(marked.status, NotificationStatus::Read);

    let page = env.notifications.list("admin", 1, 20, None).await;
    assert_eq!(page.unread_count, 0);
}

#[tokio::test]
async fn mark_all_read_only_touches_target_user() {
    let env = create_full_test_environment();

    for user in ["admin", "admin", "fotografa"] {
        env.notifications
            .create(CreateNotificationRequest {
                user_id: user.to_string(),
                title: "t".to_string(),
                message: "m".to_string(),
                kind: NotificationType::System,
                priority: Priority::Normal,
                data: serde_json::Value::Null,
                action_url: None,
                icon: None,
                image_url: None,
                scheduled_at: None,
            })
            .await;
    }

    let marked = env.notifications.mark_all_read("admin").await;
    assert_eq!(marked, 2);

    assert_eq!(env.notifications.list("admin", 1, 20, None).await.unread_count, 0);
    assert_eq!(
        env.notifications.list("fotografa", 1, 20, None).await.unread_count,
        1
    );
}

#[test]
fn preference_update_changes_only_supplied_fields() {
    let env = create_full_test_environment();

    let before = env.preferences.get("admin");
    assert!(before.marketing_enabled);

    let after = env.preferences.update(
        "admin",
        PreferencesUpdate {
            marketing_enabled: Some(false),
            quiet_hours_start: Some("23:00".to_string()),
            ..Default::default()
        },
    );

    assert!(!after.marketing_enabled);
    assert_eq!(after.quiet_hours_start, "23:00");
    assert_eq!(after.booking_enabled, before.booking_enabled);
    assert_eq!(after.quiet_hours_end, before.quiet_hours_end);
}

#[tokio::test]
async fn subscription_registration_and_deactivation() {
    let env = create_full_test_environment();

    let subscription = env
        .subscriptions
        .register(
            RegisterSubscriptionRequest {
                user_id: "admin".to_string(),
                endpoint: "https://push.example/ep1".to_string(),
                keys: SubscriptionKeys {
                    p256dh: "key".to_string(),
                    auth: "auth".to_string(),
                },
            },
            Some("Mozilla/5.0".to_string()),
        )
        .await;

    assert_eq!(env.subscriptions.active_count().await, 1);

    env.subscriptions.deactivate(subscription.id).await.unwrap();
    assert_eq!(env.subscriptions.active_count().await, 0);
    assert!(env.subscriptions.list_for_user("admin").await.is_empty());
}
