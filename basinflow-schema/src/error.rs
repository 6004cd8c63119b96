use basinflow_core::BasinflowError;
use thiserror::Error;

/// Errors that can only be detected while parsing and wiring a model
/// document — malformed YAML, an unknown component type, a missing
/// mode-specific field. Anything that requires the concrete graph (an
/// undefined reference, a cycle) is a [`BasinflowError`] and is carried
/// through unchanged.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Core(#[from] BasinflowError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
