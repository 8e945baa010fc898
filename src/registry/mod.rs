//! Network registry subsystem.
//!
//! # Data Flow
//! ```text
//! Validated config (network table + home chain)
//!     → chains.rs (closed set of chains this build understands)
//!     → network.rs (immutable Network records, id → record lookup)
//!     → shared via Arc to providers, balances, transactions
//! ```
//!
//! # Design Decisions
//! - The registry is a leaf: lookup only, no I/O, no mutation
//! - Config activates a subset of `KnownChain`; ids outside the set
//!   are rejected during config validation, not here
//! - Iteration order is the config order (drives balance row order)

pub mod chains;
pub mod network;

pub use chains::KnownChain;
pub use network::{Network, NetworkRegistry};
