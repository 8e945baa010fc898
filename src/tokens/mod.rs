//! Owned-token inventory.
//!
//! # Data Flow
//! ```text
//! inventory.rs (enumerate owner's tokens on the home chain)
//!     → token contract (balanceOf, tokenOfOwnerByIndex, tokenURI)
//!     → metadata.rs (resolve URI through the IPFS gateway, fetch JSON)
//! ```
//!
//! # Design Decisions
//! - A token whose lookups or metadata fetch fail is skipped with a
//!   warning; one broken pin never hides the rest of the collection
//! - Metadata is fetched over plain HTTP through a configured gateway,
//!   never from a node

pub mod inventory;
pub mod metadata;

pub use inventory::{OwnedToken, TokenInventory};
pub use metadata::{resolve_asset_url, MetadataClient, TokenMetadata};
