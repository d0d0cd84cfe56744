//! Email delivery.
//!
//! A `Mailer` trait fronts the SMTP transport so the rest of the service
//! (and the tests) never touch the wire directly. `EmailDispatcher`
//! combines the template catalog, the mailer, and campaign tracking for
//! the studio's marketing flows.

mod dispatcher;
mod sender;
mod types;

pub use dispatcher::{DispatcherStatsSnapshot, EmailDispatcher};
pub use sender::{create_mailer, LogMailer, Mailer, SmtpMailer};
pub use types::{BulkSendReport, CampaignRecipient, DispatchError, EmailError, EmailResult};
