//! Wallet session snapshots.

use alloy::primitives::Address;

/// Authentication state machine.
///
/// `Unauthenticated → Authenticating → Authenticated`, back to
/// `Unauthenticated` on logout, login failure, or identity mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Read-only view of the custodial session.
///
/// The provider pool owns the live session and publishes immutable
/// snapshots; components read one snapshot at operation start and
/// never re-read mid-flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub state: SessionState,

    /// Signing account, present only when authenticated.
    pub account: Option<Address>,

    /// Identity the session is bound to (email for hosted wallets).
    pub identity: Option<String>,

    /// Chain signed operations execute on.
    pub home_chain_id: u64,
}

impl WalletSession {
    pub fn unauthenticated(home_chain_id: u64) -> Self {
        Self {
            state: SessionState::Unauthenticated,
            account: None,
            identity: None,
            home_chain_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn is_authenticating(&self) -> bool {
        self.state == SessionState::Authenticating
    }

    /// Whether this session is bound to the given identity, matched
    /// case-insensitively the way email providers treat addresses.
    pub fn bound_to(&self, identity_hint: &str) -> bool {
        self.identity
            .as_deref()
            .is_some_and(|id| id.eq_ignore_ascii_case(identity_hint))
    }
}
