use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum GloveError {
    #[error("hardware error: {0}")]
    Hardware(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing adc")]
    MissingAdc,
    #[error("missing motor driver")]
    MissingMotorDriver,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Wrap a boxed collaborator error into a typed report.
pub(crate) fn hw_report(e: Box<dyn std::error::Error + Send + Sync>) -> Report {
    Report::new(GloveError::Hardware(e.to_string()))
}
