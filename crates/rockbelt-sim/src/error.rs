//! Errors surfaced by engine operations.

use thiserror::Error;

use rockbelt_core::error::ConfigError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
