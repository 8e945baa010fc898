//! Marketplace and token operations against the home chain.
//!
//! # Data Flow
//! ```text
//! operation call (list, buy, mint, ...)
//!     → ensure_authenticated (session pre-flight)
//!     → nonce + scaled gas price from the home-chain reader
//!     → typed contract call → TransactionRequest → signing handle
//!     → SubmittedTx (hash now, receipt via confirmed())
//! ```
//!
//! # Design Decisions
//! - One method per operation; the closed kind enum only carries gas
//!   budgets and metric labels
//! - Read-only views and fee estimates skip the session pre-flight
//!   entirely, they work logged out
//! - Listing prices are grossed up by the marketplace fee before they
//!   go on chain, so sellers quote what they want to receive

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{ContractPair, GasConfig, TimeoutConfig};
use crate::error::{WalletError, WalletResult};
use crate::observability::metrics;
use crate::providers::{ProviderPool, ReadOnlyHandle, SigningHandle};
use crate::transactions::contracts::{Marketplace, NftToken};
use crate::transactions::fees;
use crate::transactions::progress::SubmittedTx;
use crate::transactions::request::OperationKind;

/// Everything a prepared operation needs to go out: resolved handles,
/// synced nonce, priced gas.
struct OpContext {
    op_id: Uuid,
    kind: OperationKind,
    signing: SigningHandle,
    reader: ReadOnlyHandle,
    nonce: u64,
    gas_price: u128,
    budget: u64,
}

/// Entry point for every chain-mutating operation and the contract
/// views that back them. All signed traffic goes to the home chain.
pub struct TransactionOrchestrator {
    pool: Arc<ProviderPool>,
    contracts: ContractPair,
    gas: GasConfig,
    timeouts: TimeoutConfig,
}

impl TransactionOrchestrator {
    pub fn new(
        pool: Arc<ProviderPool>,
        contracts: ContractPair,
        gas: GasConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            pool,
            contracts,
            gas,
            timeouts,
        }
    }

    pub fn contracts(&self) -> &ContractPair {
        &self.contracts
    }

    fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.rpc_secs)
    }

    fn home_reader(&self) -> WalletResult<ReadOnlyHandle> {
        self.pool.read_only(self.pool.home_chain_id())
    }

    /// Authenticate, resolve handles and price the transaction. Runs
    /// before any calldata is built; an expired session fails here and
    /// nothing reaches the chain.
    async fn begin(&self, identity_hint: &str, kind: OperationKind) -> WalletResult<OpContext> {
        let op_id = Uuid::new_v4();
        self.pool.ensure_authenticated(identity_hint).await?;
        let signing = self.pool.signing().await?;
        let reader = self.pool.read_only(signing.chain_id())?;

        let gas_price = match reader.get_gas_price().await {
            Ok(quoted) => fees::scale_gas_price(quoted, self.gas.price_multiplier),
            Err(e) => {
                warn!(error = %e, "Gas price quote failed, using fallback");
                u128::from(self.gas.fallback_price_wei)
            }
        };
        let nonce = reader.get_transaction_count(signing.account()).await?;
        let budget = kind.gas_budget(&self.gas);

        debug!(
            %op_id,
            kind = %kind,
            account = %signing.account(),
            nonce,
            gas_price,
            budget,
            "Operation prepared"
        );

        Ok(OpContext {
            op_id,
            kind,
            signing,
            reader,
            nonce,
            gas_price,
            budget,
        })
    }

    /// Fill in the envelope fields and hand the transaction to the
    /// node. Returns once the node has accepted it under a hash.
    async fn submit(&self, op: OpContext, tx: TransactionRequest) -> WalletResult<SubmittedTx> {
        let tx = tx
            .with_from(op.signing.account())
            .with_chain_id(op.signing.chain_id())
            .with_nonce(op.nonce)
            .with_gas_limit(op.budget)
            .with_gas_price(op.gas_price);

        match op.signing.send_transaction(tx).await {
            Ok(hash) => {
                metrics::record_tx(op.kind.config_key(), "submitted");
                info!(
                    op_id = %op.op_id,
                    kind = %op.kind,
                    %hash,
                    chain_id = op.signing.chain_id(),
                    "Transaction submitted"
                );
                Ok(SubmittedTx::new(
                    hash,
                    op.op_id,
                    op.kind,
                    op.reader,
                    Duration::from_secs(self.timeouts.confirmation_poll_secs),
                    Duration::from_secs(self.timeouts.confirmation_secs),
                ))
            }
            Err(e) => {
                metrics::record_tx(op.kind.config_key(), "rejected");
                warn!(op_id = %op.op_id, kind = %op.kind, error = %e, "Submission rejected");
                Err(e)
            }
        }
    }

    /// Run a contract view under the RPC timeout, logged out is fine.
    async fn bounded_view<T, F>(&self, what: &str, fut: F) -> WalletResult<T>
    where
        F: std::future::IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        let chain_id = self.pool.home_chain_id();
        match timeout(self.rpc_timeout(), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(alloy::contract::Error::TransportError(e))) => {
                Err(WalletError::NetworkUnreachable {
                    chain_id,
                    reason: format!("{what}: {e}"),
                })
            }
            Ok(Err(e)) => Err(WalletError::ContractCallFailed(format!("{what}: {e}"))),
            Err(_) => Err(WalletError::NetworkUnreachable {
                chain_id,
                reason: format!(
                    "{what}: timeout after {}s",
                    self.timeouts.rpc_secs
                ),
            }),
        }
    }

    // ---- marketplace operations -------------------------------------

    /// Put a token up for sale. `price_wei` is the seller's ask; the
    /// buyer fee is added on top before the listing goes on chain.
    pub async fn list(
        &self,
        identity_hint: &str,
        token_id: U256,
        price_wei: U256,
        starting_time: u64,
    ) -> WalletResult<SubmittedTx> {
        let op = self.begin(identity_hint, OperationKind::List).await?;
        let total = fees::gross_up(price_wei, self.gas.marketplace_fee_bps);
        let tx = Marketplace::new(self.contracts.marketplace, op.signing.provider().clone())
            .listItem(
                self.contracts.token,
                token_id,
                U256::from(1u64),
                total,
                U256::from(starting_time),
            )
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Change the ask on an existing listing. Same fee gross-up as
    /// [`list`](Self::list).
    pub async fn update_listing(
        &self,
        identity_hint: &str,
        token_id: U256,
        new_price_wei: U256,
        starting_time: u64,
    ) -> WalletResult<SubmittedTx> {
        let op = self
            .begin(identity_hint, OperationKind::UpdateListing)
            .await?;
        let total = fees::gross_up(new_price_wei, self.gas.marketplace_fee_bps);
        let tx = Marketplace::new(self.contracts.marketplace, op.signing.provider().clone())
            .updateListing(
                self.contracts.token,
                token_id,
                total,
                U256::from(starting_time),
            )
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Take a listing down.
    pub async fn cancel_listing(
        &self,
        identity_hint: &str,
        token_id: U256,
    ) -> WalletResult<SubmittedTx> {
        let op = self
            .begin(identity_hint, OperationKind::CancelListing)
            .await?;
        let tx = Marketplace::new(self.contracts.marketplace, op.signing.provider().clone())
            .cancelListing(self.contracts.token, token_id)
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Buy a listed token from `seller`. `total_price_wei` must be the
    /// full listed price including the buyer fee; it rides along as
    /// transaction value.
    pub async fn buy(
        &self,
        identity_hint: &str,
        token_id: U256,
        seller: Address,
        total_price_wei: U256,
    ) -> WalletResult<SubmittedTx> {
        let op = self.begin(identity_hint, OperationKind::Buy).await?;
        let tx = Marketplace::new(self.contracts.marketplace, op.signing.provider().clone())
            .buyItem(self.contracts.token, token_id, seller)
            .into_transaction_request()
            .with_value(total_price_wei);
        self.submit(op, tx).await
    }

    /// Record a royalty for a token that predates on-mint royalties.
    pub async fn register_royalty(
        &self,
        identity_hint: &str,
        token_id: U256,
        royalty: u16,
    ) -> WalletResult<SubmittedTx> {
        let op = self
            .begin(identity_hint, OperationKind::RegisterRoyalty)
            .await?;
        let tx = Marketplace::new(self.contracts.marketplace, op.signing.provider().clone())
            .registerRoyalty(self.contracts.token, token_id, royalty)
            .into_transaction_request();
        self.submit(op, tx).await
    }

    // ---- token operations --------------------------------------------

    /// Mint a token to `to` with its metadata URI and royalty share.
    pub async fn mint(
        &self,
        identity_hint: &str,
        to: Address,
        uri: &str,
        royalty: u16,
    ) -> WalletResult<SubmittedTx> {
        let op = self.begin(identity_hint, OperationKind::Mint).await?;
        let tx = NftToken::new(self.contracts.token, op.signing.provider().clone())
            .safeMint(to, uri.to_string(), U256::from(royalty))
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Destroy a token the session account owns.
    pub async fn burn(&self, identity_hint: &str, token_id: U256) -> WalletResult<SubmittedTx> {
        let op = self.begin(identity_hint, OperationKind::Burn).await?;
        let tx = NftToken::new(self.contracts.token, op.signing.provider().clone())
            .burn(token_id)
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Move a token from the session account to `to`.
    pub async fn transfer(
        &self,
        identity_hint: &str,
        to: Address,
        token_id: U256,
    ) -> WalletResult<SubmittedTx> {
        let op = self.begin(identity_hint, OperationKind::Transfer).await?;
        let tx = NftToken::new(self.contracts.token, op.signing.provider().clone())
            .transferFrom(op.signing.account(), to, token_id)
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Grant the marketplace operator rights over the session
    /// account's tokens. Required once before the first listing.
    pub async fn approve_marketplace(&self, identity_hint: &str) -> WalletResult<SubmittedTx> {
        let op = self
            .begin(identity_hint, OperationKind::ApproveMarketplace)
            .await?;
        let tx = NftToken::new(self.contracts.token, op.signing.provider().clone())
            .setApprovalForAll(self.contracts.marketplace, true)
            .into_transaction_request();
        self.submit(op, tx).await
    }

    /// Send native currency, no contract involved.
    pub async fn send_native(
        &self,
        identity_hint: &str,
        to: Address,
        amount_wei: U256,
    ) -> WalletResult<SubmittedTx> {
        let op = self.begin(identity_hint, OperationKind::SendNative).await?;
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(amount_wei);
        self.submit(op, tx).await
    }

    // ---- contract views ------------------------------------------------

    /// Whether `address` currently owns `token_id`.
    pub async fn is_token_owner(&self, token_id: U256, address: Address) -> WalletResult<bool> {
        let reader = self.home_reader()?;
        let token = NftToken::new(self.contracts.token, reader.provider().clone());
        let owner = self
            .bounded_view("ownerOf", token.ownerOf(token_id).call())
            .await?;
        Ok(owner == address)
    }

    /// Royalty share recorded on the token, in whole percent.
    pub async fn royalty_of(&self, token_id: U256) -> WalletResult<u16> {
        let reader = self.home_reader()?;
        let token = NftToken::new(self.contracts.token, reader.provider().clone());
        let royalty = self
            .bounded_view("royaltyPercentage", token.royaltyPercentage(token_id).call())
            .await?;
        Ok(u16::try_from(royalty).unwrap_or(u16::MAX))
    }

    /// Whether `owner` has already granted the marketplace operator
    /// rights.
    pub async fn is_marketplace_approved(&self, owner: Address) -> WalletResult<bool> {
        let reader = self.home_reader()?;
        let token = NftToken::new(self.contracts.token, reader.provider().clone());
        self.bounded_view(
            "isApprovedForAll",
            token
                .isApprovedForAll(owner, self.contracts.marketplace)
                .call(),
        )
        .await
    }

    // ---- fee estimation -------------------------------------------------

    /// Worst-case fee for an operation as a native-unit decimal
    /// string. Needs no session.
    pub async fn estimate_max_fee(
        &self,
        kind: OperationKind,
        quantity: u32,
    ) -> WalletResult<String> {
        fees::estimate_max_fee(&self.pool, &self.gas, kind, quantity).await
    }

    /// Current home-chain gas price as a native-unit decimal string.
    pub async fn current_gas_price(&self) -> WalletResult<String> {
        fees::current_gas_price(&self.pool).await
    }
}
