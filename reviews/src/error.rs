use thiserror::Error;

/// Client input that cannot be stored.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username and comment are required")]
    MissingFields,
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("malformed request body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
    #[error("missing environment variable {0}")]
    Config(&'static str),
}

impl Error {
    /// Status code for errors answered by the endpoint itself. Faults
    /// without one are left to the runtime.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Validation(_) => Some(400),
            Error::MethodNotAllowed => Some(405),
            _ => None,
        }
    }
}
