//! RPC provider handles with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints
//! - Query chain state (balances, nonces, receipts, gas price)
//! - Submit signed transactions on the home chain
//! - Map transport failures onto the wallet error taxonomy

use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;

use crate::error::{WalletError, WalletResult};
use crate::registry::Network;

/// Query-only handle to one network. Cheap to clone; the transport is
/// shared.
#[derive(Clone)]
pub struct ReadOnlyHandle {
    chain_id: u64,
    provider: DynProvider,
    timeout_duration: Duration,
}

impl ReadOnlyHandle {
    /// Build a handle for a network. Connection is lazy; the only
    /// failure here is a malformed RPC URL.
    pub fn connect(network: &Network, rpc_timeout: Duration) -> WalletResult<Self> {
        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            WalletError::NetworkUnreachable {
                chain_id: network.chain_id,
                reason: format!("invalid RPC URL '{}': {}", network.rpc_url, e),
            }
        })?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            chain_id: network.chain_id,
            provider,
            timeout_duration: rpc_timeout,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The underlying provider, for contract bindings.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    fn unreachable(&self, reason: impl Into<String>) -> WalletError {
        WalletError::NetworkUnreachable {
            chain_id: self.chain_id,
            reason: reason.into(),
        }
    }

    /// Run one RPC call under this handle's timeout.
    async fn bounded<T, F>(&self, what: &str, fut: F) -> WalletResult<T>
    where
        F: std::future::IntoFuture<Output = Result<T, alloy::transports::TransportError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.unreachable(format!("{what}: {e}"))),
            Err(_) => Err(self.unreachable(format!(
                "{what}: timeout after {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }

    pub async fn get_balance(&self, address: Address) -> WalletResult<U256> {
        self.bounded("get_balance", self.provider.get_balance(address))
            .await
    }

    pub async fn get_gas_price(&self) -> WalletResult<u128> {
        self.bounded("get_gas_price", self.provider.get_gas_price())
            .await
    }

    pub async fn get_transaction_count(&self, address: Address) -> WalletResult<u64> {
        self.bounded(
            "get_transaction_count",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> WalletResult<Option<TransactionReceipt>> {
        self.bounded(
            "get_transaction_receipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    pub async fn get_block_number(&self) -> WalletResult<u64> {
        self.bounded("get_block_number", self.provider.get_block_number())
            .await
    }

    /// Whether the endpoint currently answers at all.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }
}

impl std::fmt::Debug for ReadOnlyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOnlyHandle")
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// Signing handle bound to one account on the home chain. At most one
/// exists per custodial session; the pool rebuilds it on re-login.
#[derive(Clone)]
pub struct SigningHandle {
    chain_id: u64,
    account: Address,
    provider: DynProvider,
    timeout_duration: Duration,
}

impl SigningHandle {
    pub fn connect(
        network: &Network,
        wallet: EthereumWallet,
        account: Address,
        rpc_timeout: Duration,
    ) -> WalletResult<Self> {
        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            WalletError::NetworkUnreachable {
                chain_id: network.chain_id,
                reason: format!("invalid RPC URL '{}': {}", network.rpc_url, e),
            }
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(url)
            .erased();

        Ok(Self {
            chain_id: network.chain_id,
            account,
            provider,
            timeout_duration: rpc_timeout,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// The wallet-backed provider, for contract bindings and the raw
    /// value-transfer path.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Submit a fully-populated transaction. Returns the hash the node
    /// accepted it under; rejection before acceptance maps to
    /// `ContractCallFailed`.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash> {
        match timeout(self.timeout_duration, self.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(WalletError::ContractCallFailed(e.to_string())),
            Err(_) => Err(WalletError::ContractCallFailed(format!(
                "submission timed out after {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }
}

impl std::fmt::Debug for SigningHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningHandle")
            .field("chain_id", &self.chain_id)
            .field("account", &self.account)
            .finish()
    }
}
