use std::sync::PoisonError;
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("{}: {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),

    #[error("response carried no vacancy")]
    MissingVacancy,
}

/// Failure to set up a simulated user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Credential pool is exhausted.")]
    PoolExhausted,

    #[error("Mutex is poisoned.")]
    PoisonData,
}

impl<T> From<PoisonError<T>> for SessionError {
    fn from(_err: PoisonError<T>) -> Self {
        Self::PoisonData
    }
}
