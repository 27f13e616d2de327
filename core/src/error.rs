//! The single error enum shared by every fallible component (C1-C9).
//!
//! The mapping from variant to HTTP status lives at the edge (the `listener`
//! crate's rejection handler), not here — this type only names *what* went
//! wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid network")]
    InvalidNetwork,

    #[error("no valid requests")]
    NoValidRequests,

    #[error("no valid signatures")]
    NoValidSignatures,

    #[error("unauthorized")]
    Unauthorized,

    #[error("document full for pubkey {0}")]
    DocumentFull(String),

    #[error("beacon node error: {0}")]
    BeaconError(String),

    #[error("store error: {0}")]
    StoreError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<mongodb::error::Error> for ServiceError {
    fn from(err: mongodb::error::Error) -> Self {
        ServiceError::StoreError(err.to_string())
    }
}
