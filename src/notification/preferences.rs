//! Per-user notification preferences
//!
//! Updates are applied through an explicit typed merge: every field of the
//! update payload is optional and only supplied fields change.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A user's notification preferences
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPreferences {
    pub user_id: String,
    pub booking_enabled: bool,
    pub payment_enabled: bool,
    pub session_enabled: bool,
    pub system_enabled: bool,
    pub marketing_enabled: bool,
    pub whatsapp_enabled: bool,
    pub push_enabled: bool,
    pub email_enabled: bool,
    pub quiet_hours_enabled: bool,
    /// "HH:MM", local studio time
    pub quiet_hours_start: String,
    pub quiet_hours_end: String,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl NotificationPreferences {
    /// Default preferences for a user that never saved any
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            booking_enabled: true,
            payment_enabled: true,
            session_enabled: true,
            system_enabled: false,
            marketing_enabled: true,
            whatsapp_enabled: true,
            push_enabled: true,
            email_enabled: true,
            quiet_hours_enabled: true,
            quiet_hours_start: "22:00".to_string(),
            quiet_hours_end: "08:00".to_string(),
            sound_enabled: true,
            vibration_enabled: true,
            updated_at: Utc::now(),
        }
    }

    /// Merge an update into the record; only supplied fields change
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(v) = update.booking_enabled {
            self.booking_enabled = v;
        }
        if let Some(v) = update.payment_enabled {
            self.payment_enabled = v;
        }
        if let Some(v) = update.session_enabled {
            self.session_enabled = v;
        }
        if let Some(v) = update.system_enabled {
            self.system_enabled = v;
        }
        if let Some(v) = update.marketing_enabled {
            self.marketing_enabled = v;
        }
        if let Some(v) = update.whatsapp_enabled {
            self.whatsapp_enabled = v;
        }
        if let Some(v) = update.push_enabled {
            self.push_enabled = v;
        }
        if let Some(v) = update.email_enabled {
            self.email_enabled = v;
        }
        if let Some(v) = update.quiet_hours_enabled {
            self.quiet_hours_enabled = v;
        }
        if let Some(v) = update.quiet_hours_start {
            self.quiet_hours_start = v;
        }
        if let Some(v) = update.quiet_hours_end {
            self.quiet_hours_end = v;
        }
        if let Some(v) = update.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = update.vibration_enabled {
            self.vibration_enabled = v;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial preference update
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub booking_enabled: Option<bool>,
    pub payment_enabled: Option<bool>,
    pub session_enabled: Option<bool>,
    pub system_enabled: Option<bool>,
    pub marketing_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
    pub quiet_hours_enabled: Option<bool>,
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
    pub sound_enabled: Option<bool>,
    pub vibration_enabled: Option<bool>,
}

/// In-memory preference storage, keyed by user id
pub struct PreferenceStore {
    preferences: DashMap<String, NotificationPreferences>,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self {
            preferences: DashMap::new(),
        }
    }

    /// Stored preferences, or defaults for an unknown user (defaults are
    /// not persisted by a read)
    pub fn get(&self, user_id: &str) -> NotificationPreferences {
        self.preferences
            .get(user_id)
            .map(|p| p.clone())
            .unwrap_or_else(|| NotificationPreferences::for_user(user_id))
    }

    /// Apply an update, creating the record from defaults when absent
    pub fn update(&self, user_id: &str, update: PreferencesUpdate) -> NotificationPreferences {
        let mut entry = self
            .preferences
            .entry(user_id.to_string())
            .or_insert_with(|| NotificationPreferences::for_user(user_id));
        entry.apply(update);
        entry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = NotificationPreferences::for_user("admin");
        assert!(prefs.booking_enabled);
        assert!(!prefs.system_enabled);
        assert_eq!(prefs.quiet_hours_start, "22:00");
    }

    #[test]
    fn test_partial_update_touches_only_supplied_fields() {
        let store = PreferenceStore::new();

        let update = PreferencesUpdate {
            marketing_enabled: Some(false),
            ..Default::default()
        };
        let updated = store.update("admin", update);

        assert!(!updated.marketing_enabled);
        // everything else still at defaults
        assert!(updated.booking_enabled);
        assert!(updated.push_enabled);
        assert_eq!(updated.quiet_hours_end, "08:00");
    }

    #[test]
    fn test_get_does_not_persist_defaults() {
        let store = PreferenceStore::new();
        let _ = store.get("admin");
        assert!(store.preferences.get("admin").is_none());
    }

    #[test]
    fn test_updates_accumulate() {
        let store = PreferenceStore::new();

        store.update(
            "admin",
            PreferencesUpdate {
                sound_enabled: Some(false),
                ..Default::default()
            },
        );
        let prefs = store.update(
            "admin",
            PreferencesUpdate {
                quiet_hours_start: Some("21:30".to_string()),
                ..Default::default()
            },
        );

        assert!(!prefs.sound_enabled);
        assert_eq!(prefs.quiet_hours_start, "21:30");
    }
}
