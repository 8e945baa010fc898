//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, normalize against KnownChain)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → consumers rebuild the registry / tear down the provider pool
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults so a minimal config works out of the box
//! - Validation separates syntactic (serde) from semantic checks
//! - A network entry only needs chain_id and rpc_url; name, symbol and
//!   hex id are filled in from the known-chain table

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::{
    ContractPair, GasConfig, MetadataConfig, NetworkConfig, TimeoutConfig, WalletConfig,
};
