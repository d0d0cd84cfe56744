//! Email delivery types and errors

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::TemplateError;

/// Email-specific error type
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
}

/// Result type for email operations
pub type EmailResult<T> = Result<T, EmailError>;

/// Error for flows that render a template and then send it
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Outcome of a bulk or campaign send
///
/// Individual failures do not abort the batch; they are reported per
/// recipient.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BulkSendReport {
    pub success: usize,
    pub failed: usize,
    /// "recipient: reason" for each failure
    pub errors: Vec<String>,
}

impl BulkSendReport {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, recipient: &str, reason: impl std::fmt::Display) {
        self.failed += 1;
        self.errors.push(format!("{}: {}", recipient, reason));
    }
}

/// One campaign recipient with its personalization variables
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignRecipient {
    pub email: String,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}
