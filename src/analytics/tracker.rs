//! Campaign event accumulation and statistics

use std::collections::HashSet;

use chrono::Utc;
use dashmap::DashMap;

use super::types::{CampaignStats, ClickEvent, OpenEvent};

#[derive(Debug, Default)]
struct TrackingRecord {
    sent_count: u64,
    opens: Vec<OpenEvent>,
    clicks: Vec<ClickEvent>,
}

/// In-memory campaign tracking, keyed by campaign id
///
/// Records are created lazily on first event and live for the process
/// lifetime. The sharded map gives each record exclusive access during a
/// mutation, so concurrent callers cannot corrupt the event sequences or
/// lose sent-count increments.
pub struct CampaignTracker {
    records: DashMap<String, TrackingRecord>,
}

impl Default for CampaignTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignTracker {
    /// Create a new campaign tracker
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Increment the sent-count for a campaign
    pub fn record_sent(&self, campaign_id: &str) {
        let mut record = self.records.entry(campaign_id.to_string()).or_default();
        record.sent_count += 1;
    }

    /// Append an open event. Duplicate opens by the same recipient are kept
    /// in the raw log; uniqueness is resolved at stats time.
    pub fn record_open(&self, campaign_id: &str, recipient: &str) {
        let mut record = self.records.entry(campaign_id.to_string()).or_default();
        record.opens.push(OpenEvent {
            recipient: recipient.to_string(),
            occurred_at: Utc::now(),
        });
    }

    /// Append a click event with its destination URL
    pub fn record_click(&self, campaign_id: &str, recipient: &str, url: &str) {
        let mut record = self.records.entry(campaign_id.to_string()).or_default();
        record.clicks.push(ClickEvent {
            recipient: recipient.to_string(),
            url: url.to_string(),
            occurred_at: Utc::now(),
        });
    }

    /// Derived statistics for a campaign
    ///
    /// An unknown campaign id is not an error; it yields all-zero stats.
    pub fn stats(&self, campaign_id: &str) -> CampaignStats {
        let Some(record) = self.records.get(campaign_id) else {
            return CampaignStats::empty(campaign_id);
        };

        let unique_opens = record
            .opens
            .iter()
            .map(|e| e.recipient.as_str())
            .collect::<HashSet<_>>()
            .len();
        let unique_clicks = record
            .clicks
            .iter()
            .map(|e| e.recipient.as_str())
            .collect::<HashSet<_>>()
            .len();

        CampaignStats {
            campaign_id: campaign_id.to_string(),
            sent_count: record.sent_count,
            open_count: record.opens.len(),
            unique_opens,
            click_count: record.clicks.len(),
            unique_clicks,
            open_rate: percentage(unique_opens as u64, record.sent_count),
            click_rate: percentage(unique_clicks as u64, record.sent_count),
            click_to_open_rate: percentage(unique_clicks as u64, unique_opens as u64),
        }
    }

    /// Number of campaigns with at least one recorded event
    pub fn campaign_count(&self) -> usize {
        self.records.len()
    }
}

fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_campaign_is_zero() {
        let tracker = CampaignTracker::new();
        let stats = tracker.stats("nao_existe");

        assert_eq!(stats.sent_count, 0);
        assert_eq!(stats.open_count, 0);
        assert_eq!(stats.open_rate, 0.0);
        assert_eq!(stats.click_rate, 0.0);
        assert_eq!(stats.click_to_open_rate, 0.0);
    }

    #[test]
    fn test_zero_sent_never_divides() {
        let tracker = CampaignTracker::new();
        tracker.record_open("camp", "a@x.com");
        tracker.record_click("camp", "a@x.com", "/url");

        let stats = tracker.stats("camp");
        assert_eq!(stats.sent_count, 0);
        assert_eq!(stats.open_count, 1);
        assert_eq!(stats.open_rate, 0.0);
        assert_eq!(stats.click_rate, 0.0);
        // click-to-open uses opens as denominator
        assert_eq!(stats.click_to_open_rate, 100.0);
    }

    #[test]
    fn test_duplicate_opens_counted_raw_but_unique_once() {
        let tracker = CampaignTracker::new();
        for _ in 0..5 {
            tracker.record_open("camp", "a@x.com");
        }

        let stats = tracker.stats("camp");
        assert_eq!(stats.open_count, 5);
        assert_eq!(stats.unique_opens, 1);
    }

    #[test]
    fn test_rates() {
        let tracker = CampaignTracker::new();
        for _ in 0..10 {
            tracker.record_sent("camp1");
        }
        tracker.record_open("camp1", "a@x.com");
        tracker.record_open("camp1", "a@x.com");
        tracker.record_open("camp1", "b@x.com");

        let stats = tracker.stats("camp1");
        assert_eq!(stats.sent_count, 10);
        assert_eq!(stats.open_count, 3);
        assert_eq!(stats.unique_opens, 2);
        assert_eq!(stats.open_rate, 20.0);

        tracker.record_click("camp1", "a@x.com", "/url1");

        let stats = tracker.stats("camp1");
        assert_eq!(stats.unique_clicks, 1);
        assert_eq!(stats.click_rate, 10.0);
        assert_eq!(stats.click_to_open_rate, 50.0);
    }

    #[test]
    fn test_campaign_count() {
        let tracker = CampaignTracker::new();
        assert_eq!(tracker.campaign_count(), 0);

        tracker.record_sent("a");
        tracker.record_open("b", "x@y.com");
        tracker.record_sent("a");

        assert_eq!(tracker.campaign_count(), 2);
    }
}
