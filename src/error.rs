//! Wallet-layer error definitions.

use thiserror::Error;

/// Errors that can occur during wallet and chain operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A single chain's RPC endpoint could not be reached or answered
    /// with garbage. Recovered locally during balance passes; fatal only
    /// for single-chain calls.
    #[error("network unreachable on chain {chain_id}: {reason}")]
    NetworkUnreachable { chain_id: u64, reason: String },

    /// Chain ID not present in the configured network table.
    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    /// A signed operation was attempted without a live custodial
    /// session, or re-authentication failed.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// The node rejected a submission, or a mined transaction reverted.
    #[error("contract call failed: {0}")]
    ContractCallFailed(String),

    /// A balance pass was superseded by a newer one. Never surfaced to
    /// callers; consumed inside the aggregator.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
