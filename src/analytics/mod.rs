//! Campaign analytics.
//!
//! Accumulates per-campaign sent/open/click events and derives open,
//! click, and click-to-open rates on demand. Raw event logs keep
//! duplicates; unique counts are computed per distinct recipient.

mod tracker;
mod types;

pub use tracker::CampaignTracker;
pub use types::{CampaignStats, ClickEvent, OpenEvent};
