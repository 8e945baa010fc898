//! Provider pool subsystem.
//!
//! # Data Flow
//! ```text
//! Registry (active networks)
//!     → handle.rs (lazy per-chain read-only RPC handles,
//!       one signing handle on the home chain)
//!     → pool.rs (handle cache, custodial session ownership)
//!     → session.rs (read-only session snapshots for other components)
//! ```
//!
//! # Design Decisions
//! - Read-only handles are created on first use and cached for the
//!   session; the cache is cleared wholesale, never pruned
//! - Exactly one signing handle exists at a time, bound to the home
//!   chain and the custodial session's account
//! - The pool owns the session; everyone else gets snapshots, so no
//!   component can observe a half-updated login

pub mod handle;
pub mod pool;
pub mod session;

pub use handle::{ReadOnlyHandle, SigningHandle};
pub use pool::ProviderPool;
pub use session::{SessionState, WalletSession};
