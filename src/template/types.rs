//! Template types and error definitions

use serde::Serialize;
use thiserror::Error;

use super::substitution::scan_placeholders;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template '{template}' has no value for placeholder '{variable}'")]
    MissingVariable { template: String, variable: String },

    #[error("Invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// An email template definition
///
/// Subject and body carry `{variable}` placeholder tokens. The declared
/// `variables` list is descriptive metadata for API consumers; rendering
/// is enforced against the tokens actually present in the text.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Subject pattern
    pub subject: String,

    /// HTML body pattern
    pub body: String,

    /// Declared variable names, in the order callers should supply them
    pub variables: Vec<String>,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        variables: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
            variables: variables.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Validate the template
    ///
    /// Besides basic id/name checks, the declared variable list must match
    /// the placeholder tokens scanned from the subject and body. A catalog
    /// entry whose metadata disagrees with its own text is rejected at
    /// construction rather than surfacing as a confusing render failure.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidTemplate {
                template: self.id.clone(),
                reason: "ID must be 1-64 characters".to_string(),
            });
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplateError::InvalidTemplate {
                template: self.id.clone(),
                reason: "ID must contain only alphanumeric, dash, or underscore".to_string(),
            });
        }

        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate {
                template: self.id.clone(),
                reason: "Name must be 1-256 characters".to_string(),
            });
        }

        let scanned = self.placeholders();

        for variable in &self.variables {
            if !scanned.iter().any(|s| s == variable) {
                return Err(TemplateError::InvalidTemplate {
                    template: self.id.clone(),
                    reason: format!(
                        "declared variable '{}' does not appear in subject or body",
                        variable
                    ),
                });
            }
        }

        for token in &scanned {
            if !self.variables.iter().any(|v| v == token) {
                return Err(TemplateError::InvalidTemplate {
                    template: self.id.clone(),
                    reason: format!("placeholder '{{{}}}' is not declared", token),
                });
            }
        }

        Ok(())
    }

    /// Placeholder tokens present in the subject and body, in order of
    /// first appearance (subject first)
    pub fn placeholders(&self) -> Vec<String> {
        let mut tokens = scan_placeholders(&self.subject);
        for token in scan_placeholders(&self.body) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}

/// A rendered template ready to hand to the mailer
#[derive(Debug, Clone, Serialize)]
pub struct RenderedEmail {
    /// Catalog id of the source template
    pub template_id: String,

    /// Human-readable template name
    pub name: String,

    /// Fully substituted subject
    pub subject: String,

    /// Fully substituted HTML body
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let template = Template::new(
            "welcome",
            "Welcome",
            "Hello, {nome}!",
            "<p>Welcome, {nome}. <a href=\"{unsubscribe_url}\">Unsubscribe</a></p>",
            &["nome", "unsubscribe_url"],
        );
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_validate_undeclared_placeholder() {
        let template = Template::new(
            "welcome",
            "Welcome",
            "Hello, {nome}!",
            "<p>{extra}</p>",
            &["nome"],
        );
        assert!(matches!(
            template.validate(),
            Err(TemplateError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_validate_declared_but_unused() {
        let template = Template::new("welcome", "Welcome", "Hello!", "<p>Hi</p>", &["nome"]);
        assert!(matches!(
            template.validate(),
            Err(TemplateError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_validate_invalid_id() {
        let template = Template::new("bad/id", "Test", "Hi", "Body", &[]);
        assert!(matches!(
            template.validate(),
            Err(TemplateError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_placeholders_order() {
        let template = Template::new(
            "t",
            "T",
            "{b} and {a}",
            "{a} then {c}",
            &["b", "a", "c"],
        );
        assert_eq!(template.placeholders(), vec!["b", "a", "c"]);
    }
}
