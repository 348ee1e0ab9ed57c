use cadence_abr::{AbrError, MediaType};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("no ladder registered for {0}")]
    UnknownMediaType(MediaType),
    #[error("a ladder is already registered for {0}")]
    DuplicateMediaType(MediaType),
    #[error(transparent)]
    Abr(#[from] AbrError),
}

pub type SessionResult<T> = Result<T, SessionError>;
