//! Error types for clc-predict.
//!
//! Deliberately small: unknown tracks are lookup misses (empty rollout,
//! zero risk), not errors.  Only configuration can fail here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("tracker configuration error: {0}")]
    Config(String),
}

pub type PredictResult<T> = Result<T, PredictError>;
