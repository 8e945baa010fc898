//! Development signer backed by a local private key.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or
//!   explicit test constructors
//! - Keys are never logged or serialized

use std::sync::atomic::{AtomicBool, Ordering};

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::custodial::{CustodialAuth, CustodialSession};
use crate::error::{WalletError, WalletResult};

/// Local-key stand-in for the hosted custodial service.
///
/// Keeps the same session semantics (login required before signing,
/// logout drops the session) so the provider pool exercises identical
/// paths in development and production.
#[derive(Debug)]
pub struct LocalKeyAuth {
    signer: PrivateKeySigner,
    logged_in: AtomicBool,
}

impl LocalKeyAuth {
    /// Create from a hex-encoded private key (with or without 0x
    /// prefix).
    pub fn from_private_key(private_key_hex: &str) -> WalletResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            WalletError::Unauthenticated(format!("invalid private key format: {}", e))
        })?;

        tracing::info!(address = %signer.address(), "Development signer initialized");

        Ok(Self {
            signer,
            logged_in: AtomicBool::new(false),
        })
    }

    /// Load the key from the environment variable named in config.
    pub fn from_env(env_var: &str) -> WalletResult<Self> {
        let private_key = std::env::var(env_var).map_err(|_| {
            WalletError::Unauthenticated(format!("environment variable {} not set", env_var))
        })?;

        Self::from_private_key(&private_key)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl CustodialAuth for LocalKeyAuth {
    async fn login(&self, identity_hint: &str) -> WalletResult<CustodialSession> {
        self.logged_in.store(true, Ordering::SeqCst);
        Ok(CustodialSession {
            account: self.signer.address(),
            identity: identity_hint.to_string(),
            wallet: EthereumWallet::from(self.signer.clone()),
        })
    }

    async fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    async fn logout(&self) {
        self.logged_in.store(false, Ordering::SeqCst);
    }
}
