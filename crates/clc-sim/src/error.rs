use clc_comm::CommError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("loop configuration error: {0}")]
    Config(String),

    /// A controlled vehicle was missing from the identity map.  Fatal for
    /// the tick being processed — surfaced, never skipped.
    #[error("vehicle {0:?} has no node mapping")]
    UnmappedVehicle(String),

    #[error("communication trace error: {0}")]
    Comm(CommError),
}

impl From<CommError> for SimError {
    fn from(e: CommError) -> Self {
        match e {
            CommError::UnmappedVehicle(label) => SimError::UnmappedVehicle(label),
            other => SimError::Comm(other),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
