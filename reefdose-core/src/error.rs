use thiserror::Error;

/// Hard failures of the library. Missing user facts are never reported here;
/// they surface as follow-up questions instead.
#[derive(Debug, Error)]
pub enum DoseError {
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Window of {0} days cannot be applied to the reading timeline")]
    WindowOutOfRange(f64),
}
