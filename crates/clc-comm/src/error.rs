//! Error types for clc-comm.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommError {
    /// A vehicle label had no entry in the vehicle→node identity map.
    #[error("vehicle {0:?} has no node mapping")]
    UnmappedVehicle(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type CommResult<T> = Result<T, CommError>;
