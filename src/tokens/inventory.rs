//! Enumerating the tokens an account owns.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::MetadataConfig;
use crate::error::{WalletError, WalletResult};
use crate::providers::{ProviderPool, ReadOnlyHandle};
use crate::tokens::metadata::{MetadataClient, TokenMetadata};
use crate::transactions::contracts::NftToken;

/// One token from the owner's collection, with its pinned metadata.
#[derive(Debug, Clone)]
pub struct OwnedToken {
    pub token_id: U256,
    pub uri: String,
    pub metadata: TokenMetadata,
}

/// Reads an owner's collection off the home-chain token contract.
pub struct TokenInventory {
    pool: Arc<ProviderPool>,
    token_address: Address,
    metadata: MetadataClient,
    rpc_timeout: Duration,
}

impl TokenInventory {
    pub fn new(
        pool: Arc<ProviderPool>,
        token_address: Address,
        config: &MetadataConfig,
        rpc_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            token_address,
            metadata: MetadataClient::new(
                config.ipfs_gateway.clone(),
                Duration::from_secs(config.http_timeout_secs),
            ),
            rpc_timeout,
        }
    }

    /// All tokens `owner` holds, in contract enumeration order.
    ///
    /// The owner's balance must be readable; past that, each token is
    /// assembled independently and any that fails (index lookup, URI
    /// lookup, metadata fetch) is dropped with a warning.
    pub async fn owned_tokens(&self, owner: Address) -> WalletResult<Vec<OwnedToken>> {
        let reader = self.pool.read_only(self.pool.home_chain_id())?;
        let token = NftToken::new(self.token_address, reader.provider().clone());

        let balance = self
            .bounded(&reader, "balanceOf", token.balanceOf(owner).call())
            .await?;
        // A balance past u64 is not a real collection.
        let count = u64::try_from(balance).unwrap_or(0);
        debug!(%owner, count, "Enumerating owned tokens");

        let lookups = (0..count).map(|index| {
            let token = token.clone();
            let reader = reader.clone();
            async move {
                let token_id = match self
                    .bounded(
                        &reader,
                        "tokenOfOwnerByIndex",
                        token.tokenOfOwnerByIndex(owner, U256::from(index)).call(),
                    )
                    .await
                {
                    Ok(id) => id,
                    Err(e) => {
                        warn!(index, error = %e, "Token index lookup failed, skipping");
                        return None;
                    }
                };
                let uri = match self
                    .bounded(&reader, "tokenURI", token.tokenURI(token_id).call())
                    .await
                {
                    Ok(uri) => uri,
                    Err(e) => {
                        warn!(%token_id, error = %e, "Token URI lookup failed, skipping");
                        return None;
                    }
                };
                let metadata = self.metadata.fetch(&uri).await?;
                Some(OwnedToken {
                    token_id,
                    uri,
                    metadata,
                })
            }
        });

        let tokens = join_all(lookups).await.into_iter().flatten().collect();
        Ok(tokens)
    }

    async fn bounded<T, F>(
        &self,
        reader: &ReadOnlyHandle,
        what: &str,
        fut: F,
    ) -> WalletResult<T>
    where
        F: std::future::IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(alloy::contract::Error::TransportError(e))) => {
                Err(WalletError::NetworkUnreachable {
                    chain_id: reader.chain_id(),
                    reason: format!("{what}: {e}"),
                })
            }
            Ok(Err(e)) => Err(WalletError::ContractCallFailed(format!("{what}: {e}"))),
            Err(_) => Err(WalletError::NetworkUnreachable {
                chain_id: reader.chain_id(),
                reason: format!("{what}: timeout after {}s", self.rpc_timeout.as_secs()),
            }),
        }
    }
}
