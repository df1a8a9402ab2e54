//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into `ClcError`
//! via `From` impls or wrap it as one variant.  Lookup misses (unknown track,
//! absent neighbor table, unseen receiver) are deliberately NOT errors
//! anywhere in the framework — they yield empty/default results so one
//! silent vehicle cannot stall the loop.

use thiserror::Error;

/// The top-level error type for `clc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum ClcError {
    /// A vehicle label had no entry in the vehicle→node identity map.
    /// Fatal for the affected decision; never silently skipped.
    #[error("vehicle {0:?} has no node mapping")]
    UnmappedVehicle(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `clc-*` crates.
pub type ClcResult<T> = Result<T, ClcError>;
