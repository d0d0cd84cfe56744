//! Marketing email template system.
//!
//! This module provides:
//! - A fixed, read-only catalog of the studio's email templates
//! - Placeholder scanning ({variable} tokens) over subject and body text
//! - A substitution engine that fails on missing variables instead of
//!   emitting partially rendered strings

mod catalog;
mod substitution;
mod types;

pub use catalog::TemplateCatalog;
pub use substitution::{scan_placeholders, substitute};
pub use types::{RenderedEmail, Template, TemplateError, TemplateResult};
