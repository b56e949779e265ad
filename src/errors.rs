use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    NotFound(String),
}

impl LeaderboardError {
    /// HTTP status code reported to the caller for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            LeaderboardError::Validation(_) => 400,
            LeaderboardError::NotFound(_) => 404,
            LeaderboardError::Store(_) => 500,
        }
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<SdkError<E, R>> for LeaderboardError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        LeaderboardError::Store(DisplayErrorContext(&error).to_string())
    }
}

impl From<BuildError> for LeaderboardError {
    fn from(error: BuildError) -> Self {
        LeaderboardError::Store(format!("Failed to build DynamoDB request: {error}"))
    }
}
