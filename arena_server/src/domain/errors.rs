use thiserror::Error;

// Domain-level errors for simulation setup.
#[derive(Debug, Error)]
#[error("invalid tuning: {0}")]
pub struct InvalidTuning(pub String);
