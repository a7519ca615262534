use thiserror::Error;

/// Errors raised while loading or resolving the configuration.
#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("config file not found: {0}")]
    MissingConfig(String),

    #[error("missing environment: {0}")]
    MissingEnvironment(String),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("missing secret: {0}")]
    MissingSecret(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Extraction(#[from] Box<figment::Error>),
}
