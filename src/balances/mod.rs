//! Balance aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! UI requests balances for an address
//!     → aggregator.rs (pass bookkeeping: generation, abort, target)
//!     → source.rs (one native-balance query per active network,
//!       through the provider pool's read-only handles)
//!     → types.rs (per-chain entries, native-unit formatting)
//!     → snapshot published atomically, selection persisted
//! ```
//!
//! # Design Decisions
//! - Per-network failures become per-network entries; a pass never
//!   aborts because one chain is down
//! - Overlapping passes resolve last-started-wins; superseded passes
//!   skip publication and are never surfaced as errors
//! - A pass for the address that already completed returns the
//!   published snapshot without touching the network

pub mod aggregator;
pub mod source;
pub mod types;

pub use aggregator::BalanceAggregator;
pub use source::{BalanceSource, PoolBalanceSource};
pub use types::{format_native, format_native_exact, ChainBalance};
