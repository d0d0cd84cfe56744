mod settings;

pub use settings::{ApiConfig, EmailConfig, OtelConfig, ServerConfig, Settings, SmtpConfig};
