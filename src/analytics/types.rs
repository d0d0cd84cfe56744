//! Campaign tracking event and statistics types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A recorded email-open event
#[derive(Debug, Clone, Serialize)]
pub struct OpenEvent {
    /// Recipient identifier (email address)
    pub recipient: String,
    /// When the open was recorded
    pub occurred_at: DateTime<Utc>,
}

/// A recorded link-click event
#[derive(Debug, Clone, Serialize)]
pub struct ClickEvent {
    /// Recipient identifier (email address)
    pub recipient: String,
    /// Destination URL that was clicked
    pub url: String,
    /// When the click was recorded
    pub occurred_at: DateTime<Utc>,
}

/// Derived statistics for one campaign
///
/// Rates are percentages. A zero denominator yields a 0.0 rate, never a
/// division fault; an unknown campaign yields all-zero stats.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignStats {
    pub campaign_id: String,
    /// Emails sent for this campaign (rate denominator)
    pub sent_count: u64,
    /// Raw open events, duplicates included
    pub open_count: usize,
    /// Distinct recipients with at least one open
    pub unique_opens: usize,
    /// Raw click events
    pub click_count: usize,
    /// Distinct recipients with at least one click
    pub unique_clicks: usize,
    /// unique_opens / sent_count * 100
    pub open_rate: f64,
    /// unique_clicks / sent_count * 100
    pub click_rate: f64,
    /// unique_clicks / unique_opens * 100
    pub click_to_open_rate: f64,
}

impl CampaignStats {
    /// All-zero stats for a campaign with no recorded events
    pub fn empty(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            sent_count: 0,
            open_count: 0,
            unique_opens: 0,
            click_count: 0,
            unique_clicks: 0,
            open_rate: 0.0,
            click_rate: 0.0,
            click_to_open_rate: 0.0,
        }
    }
}
