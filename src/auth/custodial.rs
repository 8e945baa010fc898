//! Custodial auth collaborator boundary.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use async_trait::async_trait;

use crate::error::WalletResult;

/// A live signing session handed back by the custodial collaborator.
///
/// The wallet inside is bound to exactly one account. Sessions are
/// cheap to clone; the signer itself is shared.
#[derive(Clone)]
pub struct CustodialSession {
    /// Account the session signs for.
    pub account: Address,

    /// Identity the session was opened with (an email for hosted
    /// wallets, a label for the development signer).
    pub identity: String,

    /// Ready-to-use signer. Key material stays with the collaborator.
    pub wallet: EthereumWallet,
}

impl std::fmt::Debug for CustodialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The wallet is deliberately omitted.
        f.debug_struct("CustodialSession")
            .field("account", &self.account)
            .field("identity", &self.identity)
            .finish()
    }
}

/// The custodial wallet service this crate delegates signing to.
///
/// Production embeds a client for its hosted-wallet vendor; tests and
/// development use [`LocalKeyAuth`](crate::auth::LocalKeyAuth). The
/// provider pool is the only caller.
#[async_trait]
pub trait CustodialAuth: Send + Sync {
    /// Open (or re-open) a session for the given identity. A failure
    /// must leave no half-open session behind.
    async fn login(&self, identity_hint: &str) -> WalletResult<CustodialSession>;

    /// Whether the collaborator still considers its session live.
    /// Checked before every signed operation; hosted sessions expire
    /// on their own schedule.
    async fn is_logged_in(&self) -> bool;

    /// Drop the current session. Idempotent.
    async fn logout(&self);
}

/// Backend for deployments with no signing capability at all. Every
/// login attempt fails; the read-only surface (balances, views, fee
/// estimates) stays fully usable.
pub struct SessionlessAuth;

#[async_trait]
impl CustodialAuth for SessionlessAuth {
    async fn login(&self, _identity_hint: &str) -> WalletResult<CustodialSession> {
        Err(crate::error::WalletError::Unauthenticated(
            "no custodial backend configured".to_string(),
        ))
    }

    async fn is_logged_in(&self) -> bool {
        false
    }

    async fn logout(&self) {}
}
