pub mod classifier;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use classifier::Classifier;
