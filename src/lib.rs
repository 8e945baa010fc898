//! Wallet and chain-transaction layer for an NFT marketplace client.

pub mod auth;
pub mod balances;
pub mod config;
pub mod error;
pub mod observability;
pub mod providers;
pub mod registry;
pub mod storage;
pub mod tokens;
pub mod transactions;

pub use balances::BalanceAggregator;
pub use config::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use providers::ProviderPool;
pub use registry::NetworkRegistry;
pub use transactions::TransactionOrchestrator;
