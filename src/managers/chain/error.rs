use thiserror::Error;

/// Error types for chain access
#[derive(Error, Debug)]
pub(crate) enum ChainError {
    /// No RPC endpoint could be reached
    #[error("failed to connect to any RPC endpoint ({attempts} attempted)")]
    RpcConnectionFailed { attempts: usize },

    /// Transport-level RPC error
    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    /// Contract call error
    #[error("contract call error: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// Round index reported by the contract does not fit the internal
    /// signed 64-bit representation
    #[error("round index out of range: {0}")]
    RoundIndexOverflow(String),
}
