//! Concurrent multi-chain balance passes with supersession.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use arc_swap::ArcSwap;
use futures_util::future::join_all;

use crate::balances::source::{BalanceSource, PoolBalanceSource};
use crate::balances::types::{format_native, ChainBalance};
use crate::error::{WalletError, WalletResult};
use crate::observability::metrics;
use crate::providers::ProviderPool;
use crate::storage::{KvStore, SELECTED_VIEWING_CHAIN};

/// Multi-chain native balance view.
///
/// One pass queries every active network concurrently and publishes
/// the full entry set in a single swap. Overlapping passes resolve
/// last-started-wins: an older pass notices it was superseded after
/// its queries settle and skips publication. The caller still gets its
/// own entries back either way; only the shared snapshot is guarded.
pub struct BalanceAggregator {
    pool: Arc<ProviderPool>,
    source: Arc<dyn BalanceSource>,
    store: KvStore,
    snapshot: ArcSwap<Vec<ChainBalance>>,
    /// Start-ordered pass counter; the newest generation owns the
    /// snapshot.
    generation: AtomicU64,
    /// Abort flag of the in-flight pass, tripped when a newer pass
    /// starts.
    current_abort: Mutex<Option<Arc<AtomicBool>>>,
    /// Address the newest pass is fetching for.
    current_target: Mutex<Option<Address>>,
    /// Address of the last pass that published, for the idempotent
    /// short-circuit.
    last_completed: Mutex<Option<Address>>,
    selected_chain: AtomicU64,
}

impl BalanceAggregator {
    pub fn new(pool: Arc<ProviderPool>, store: KvStore) -> Self {
        let source = Arc::new(PoolBalanceSource::new(pool.clone()));
        Self::with_source(pool, source, store)
    }

    /// Build with a custom balance source. Tests inject fakes here.
    pub fn with_source(
        pool: Arc<ProviderPool>,
        source: Arc<dyn BalanceSource>,
        store: KvStore,
    ) -> Self {
        let registry = pool.registry();
        let selected_chain = store
            .get::<u64>(SELECTED_VIEWING_CHAIN)
            .filter(|id| registry.contains(*id))
            .unwrap_or_else(|| {
                tracing::debug!("No usable persisted viewing chain, using default");
                registry.default_chain_id()
            });

        Self {
            pool,
            source,
            store,
            snapshot: ArcSwap::from_pointee(Vec::new()),
            generation: AtomicU64::new(0),
            current_abort: Mutex::new(None),
            current_target: Mutex::new(None),
            last_completed: Mutex::new(None),
            selected_chain: AtomicU64::new(selected_chain),
        }
    }

    /// The published entry set: empty before the first pass, otherwise
    /// one entry per network from the pass that most recently won.
    pub fn balances(&self) -> Arc<Vec<ChainBalance>> {
        self.snapshot.load_full()
    }

    /// Refresh every active network's balance for `address`.
    ///
    /// Queries run concurrently, one per network, each bounded by the
    /// RPC timeout. A chain failure fills that entry's `error` and
    /// never aborts the pass. If `address` already has a published
    /// pass, the snapshot is returned as-is.
    pub async fn refresh_all_balances(&self, address: Address) -> Vec<ChainBalance> {
        if *self.last_completed.lock().expect("completed pass mutex poisoned") == Some(address) {
            metrics::record_balance_pass("short_circuit");
            tracing::debug!(%address, "Balances already current, skipping refresh");
            return self.snapshot.load().as_ref().clone();
        }

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let abort = Arc::new(AtomicBool::new(false));
        {
            let mut slot = self.current_abort.lock().expect("abort flag mutex poisoned");
            if let Some(previous) = slot.replace(abort.clone()) {
                previous.store(true, Ordering::SeqCst);
            }
            *self.current_target.lock().expect("pass target mutex poisoned") = Some(address);
        }

        let registry = self.pool.registry();
        let networks = registry.networks().to_vec();

        self.snapshot
            .store(Arc::new(networks.iter().map(ChainBalance::loading).collect()));

        let queries = networks.iter().map(|network| {
            let source = self.source.clone();
            async move {
                match source.native_balance(network.chain_id, address).await {
                    Ok(wei) => {
                        metrics::record_balance_query(network.chain_id, true);
                        ChainBalance::settled(network, format_native(wei))
                    }
                    Err(e) => {
                        metrics::record_balance_query(network.chain_id, false);
                        tracing::warn!(
                            chain_id = network.chain_id,
                            error = %e,
                            "Balance query failed"
                        );
                        ChainBalance::failed(network, e.to_string())
                    }
                }
            }
        });
        let entries = join_all(queries).await;

        match self.try_publish(my_generation, address, &abort, entries.clone()) {
            Ok(()) => {
                metrics::record_balance_pass("published");
                tracing::debug!(%address, entries = entries.len(), "Balance pass published");
            }
            Err(e) => {
                metrics::record_balance_pass("superseded");
                tracing::debug!(%address, error = %e, "Balance pass not published");
            }
        }
        entries
    }

    /// Commit a finished pass unless a newer one took over while its
    /// queries ran. The cancellation signal never leaves the
    /// aggregator; a superseded caller still gets its own entries.
    fn try_publish(
        &self,
        generation: u64,
        address: Address,
        abort: &AtomicBool,
        entries: Vec<ChainBalance>,
    ) -> WalletResult<()> {
        let superseded = abort.load(Ordering::SeqCst)
            || self.generation.load(Ordering::SeqCst) != generation
            || *self.current_target.lock().expect("pass target mutex poisoned") != Some(address);
        if superseded {
            return Err(WalletError::Cancelled);
        }

        self.snapshot.store(Arc::new(entries));
        *self.last_completed.lock().expect("completed pass mutex poisoned") = Some(address);
        Ok(())
    }

    /// Native balance of `address` on one chain, formatted. Unlike a
    /// pass entry, a failure here is the caller's error.
    pub async fn balance_on(&self, address: Address, chain_id: u64) -> WalletResult<String> {
        self.pool.registry().get(chain_id)?;
        let wei = self.source.native_balance(chain_id, address).await?;
        Ok(format_native(wei))
    }

    /// Balance on the selected viewing chain; `None` address means no
    /// wallet is connected, which is not an error.
    pub async fn selected_chain_balance(
        &self,
        address: Option<Address>,
    ) -> WalletResult<Option<String>> {
        let Some(address) = address else {
            return Ok(None);
        };
        let balance = self.balance_on(address, self.selected_chain()).await?;
        Ok(Some(balance))
    }

    pub fn selected_chain(&self) -> u64 {
        self.selected_chain.load(Ordering::SeqCst)
    }

    /// Switch the viewing chain and persist the choice. An id outside
    /// the active set leaves the current selection in effect.
    pub fn switch_viewing_chain(&self, chain_id: u64) -> WalletResult<()> {
        if !self.pool.registry().contains(chain_id) {
            return Err(WalletError::UnsupportedChain(chain_id));
        }

        self.selected_chain.store(chain_id, Ordering::SeqCst);
        if let Err(e) = self.store.set(SELECTED_VIEWING_CHAIN, &chain_id) {
            tracing::warn!(error = %e, "Failed to persist viewing chain selection");
        }
        tracing::info!(chain_id, "Viewing chain switched");
        Ok(())
    }
}
