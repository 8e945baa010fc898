//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, subscriber init)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the embedding host installs
//! ```
//!
//! # Design Decisions
//! - Metrics go through the `metrics` facade; this crate never installs
//!   a recorder, the host application does
//! - Operation IDs (UUID v4) flow through transaction log events
//! - Metric updates are cheap (atomic increments)

pub mod logging;
pub mod metrics;
