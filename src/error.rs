use thiserror::Error;

/// Top-level application error that composes all subsystem errors
#[derive(Error, Debug)]
pub(crate) enum NodeError {
    /// Chain-related errors
    #[error("Chain error: {0}")]
    Chain(#[from] crate::managers::chain::ChainError),

    /// Database/repository errors
    #[error("Repository error: {0}")]
    Repository(#[from] crate::managers::repository::RepositoryError),
}
