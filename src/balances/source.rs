//! Where balance queries actually go.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::WalletResult;
use crate::providers::ProviderPool;

/// Native-balance lookup for one chain. The aggregator only talks to
/// this trait, which keeps pass bookkeeping testable without sockets.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn native_balance(&self, chain_id: u64, address: Address) -> WalletResult<U256>;
}

/// Production source: the provider pool's read-only handles, which
/// carry the per-request timeout.
pub struct PoolBalanceSource {
    pool: Arc<ProviderPool>,
}

impl PoolBalanceSource {
    pub fn new(pool: Arc<ProviderPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BalanceSource for PoolBalanceSource {
    async fn native_balance(&self, chain_id: u64, address: Address) -> WalletResult<U256> {
        let handle = self.pool.read_only(chain_id)?;
        handle.get_balance(address).await
    }
}
