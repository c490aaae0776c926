//! HTTP handlers for the classifier service.

pub mod classify;
pub mod health;
pub mod metrics;

pub use classify::classify_transactions;
pub use health::{health_check, readiness_check, root};
pub use metrics::metrics;
