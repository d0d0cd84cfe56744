// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod metrics;

// Domain layer (business logic)
pub mod analytics;
pub mod email;
pub mod notification;
pub mod template;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod telemetry;
