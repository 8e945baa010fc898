//! Durable key-value storage.
//!
//! Small JSON-file store for UI state that must survive restarts, such
//! as the selected viewing chain. Not a cache: writes are rare and
//! persisted immediately.

pub mod kv;

pub use kv::KvStore;
pub use kv::SELECTED_VIEWING_CHAIN;
