//! Custodial authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Provider pool needs a signer
//!     → custodial.rs (CustodialAuth trait, session type)
//!     → production host injects its own implementation
//!     → local.rs (env-key signer for development and tests)
//! ```
//!
//! # Security Constraints
//! - This crate never sees custodial key material; the collaborator
//!   returns a ready-to-use wallet
//! - The development signer loads its key ONLY from an environment
//!   variable and never logs it

pub mod custodial;
pub mod local;

pub use custodial::{CustodialAuth, CustodialSession, SessionlessAuth};
pub use local::LocalKeyAuth;
