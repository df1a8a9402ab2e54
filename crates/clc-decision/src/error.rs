//! Error types for clc-decision.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("gate configuration error: {0}")]
    Config(String),
}

pub type DecisionResult<T> = Result<T, DecisionError>;
