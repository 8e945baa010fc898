//! Transaction orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! Caller names an operation (list, buy, mint, ...)
//!     → orchestrator.rs (auth pre-flight, nonce + gas price, submit)
//!     → contracts.rs (token / marketplace ABI bindings)
//!     → request.rs (operation kinds, gas budgets)
//!     → fees.rs (price scaling, fee gross-up, estimates)
//!     → progress.rs (submitted stage → confirmed stage)
//! ```
//!
//! # Design Decisions
//! - Every operation authenticates first; nothing touches a contract
//!   without a live session
//! - Gas budgets are fixed per kind in config, never estimated per call
//! - Submission and confirmation are two awaitable stages; the
//!   confirmed stage only exists on a value the submitted stage
//!   produced
//! - Every submission is awaited; there is no fire-and-forget path

pub mod contracts;
pub mod fees;
pub mod orchestrator;
pub mod progress;
pub mod request;

pub use orchestrator::TransactionOrchestrator;
pub use progress::SubmittedTx;
pub use request::OperationKind;
