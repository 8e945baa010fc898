//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::WalletConfig;
use crate::providers::ProviderPool;

/// A watcher that monitors the configuration file for changes.
///
/// Consumers receive already-validated configs; an edit that fails
/// validation is logged and dropped, keeping the running config.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<WalletConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<WalletConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        match load_config(&path) {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload config: {}. Keeping current configuration.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Whether two configs disagree on the network table. Only the home
/// chain, the set of active chains and their endpoints count; gas or
/// timeout edits never tear down live connections.
pub fn chain_list_changed(current: &WalletConfig, incoming: &WalletConfig) -> bool {
    if current.networks.home_chain_id != incoming.networks.home_chain_id {
        return true;
    }
    let endpoints = |config: &WalletConfig| -> Vec<(u64, String)> {
        config
            .networks
            .active
            .iter()
            .map(|n| (n.chain_id, n.rpc_url.clone()))
            .collect()
    };
    endpoints(current) != endpoints(incoming)
}

/// Drive provider-pool resets from watcher updates. Runs until the
/// watcher side drops. Each update that actually changes the chain
/// list rebuilds the registry and tears the pool down; everything else
/// is ignored so sessions and cached handles survive unrelated edits.
pub async fn apply_chain_list_updates(
    mut updates: mpsc::UnboundedReceiver<WalletConfig>,
    pool: Arc<ProviderPool>,
    mut current: WalletConfig,
) {
    while let Some(incoming) = updates.recv().await {
        if !chain_list_changed(&current, &incoming) {
            tracing::debug!("Config reloaded without chain-list changes, pool kept");
            current = incoming;
            continue;
        }
        match incoming.build_registry() {
            Ok(registry) => {
                tracing::info!(
                    networks = registry.len(),
                    home_chain_id = registry.default_chain_id(),
                    "Chain list changed, resetting provider pool"
                );
                pool.reset(registry).await;
                current = incoming;
            }
            Err(e) => {
                tracing::error!("Rejected chain-list update: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalKeyAuth;
    use crate::config::schema::NetworkConfig;

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn config_with_chains(home: u64, chains: &[(u64, &str)]) -> WalletConfig {
        let mut config = WalletConfig::default();
        config.networks.home_chain_id = home;
        config.networks.active = chains
            .iter()
            .map(|(chain_id, rpc_url)| NetworkConfig {
                chain_id: *chain_id,
                rpc_url: rpc_url.to_string(),
                name: String::new(),
                native_symbol: String::new(),
                chain_id_hex: String::new(),
                block_explorer_url: String::new(),
            })
            .collect();
        config.normalize();
        config
    }

    fn pool_for(config: &WalletConfig) -> Arc<ProviderPool> {
        let auth = Arc::new(LocalKeyAuth::from_private_key(DEV_KEY).unwrap());
        Arc::new(ProviderPool::new(
            config.build_registry().unwrap(),
            auth,
            Duration::from_millis(200),
        ))
    }

    #[test]
    fn test_gas_edit_is_not_a_chain_list_change() {
        let a = config_with_chains(137, &[(137, "http://127.0.0.1:1")]);
        let mut b = a.clone();
        b.gas.default_budget = 900_000;
        assert!(!chain_list_changed(&a, &b));
    }

    #[test]
    fn test_endpoint_and_home_edits_are_changes() {
        let a = config_with_chains(137, &[(137, "http://127.0.0.1:1")]);

        let moved = config_with_chains(137, &[(137, "http://127.0.0.1:2")]);
        assert!(chain_list_changed(&a, &moved));

        let grown = config_with_chains(137, &[(137, "http://127.0.0.1:1"), (1, "http://127.0.0.1:3")]);
        assert!(chain_list_changed(&a, &grown));
    }

    #[tokio::test]
    async fn test_gas_only_update_keeps_pool() {
        let initial = config_with_chains(137, &[(137, "http://127.0.0.1:1")]);
        let pool = pool_for(&initial);
        pool.read_only(137).unwrap();
        assert_eq!(pool.cached_handles(), 1);

        let (tx, rx) = mpsc::unbounded_channel();
        let apply = tokio::spawn(apply_chain_list_updates(
            rx,
            Arc::clone(&pool),
            initial.clone(),
        ));

        let mut gas_only = initial;
        gas_only.gas.default_budget = 700_000;
        tx.send(gas_only).unwrap();
        drop(tx);
        apply.await.unwrap();

        assert_eq!(pool.cached_handles(), 1);
        assert!(!pool.registry().contains(1));
    }

    #[tokio::test]
    async fn test_chain_change_resets_pool() {
        let initial = config_with_chains(137, &[(137, "http://127.0.0.1:1")]);
        let pool = pool_for(&initial);
        pool.read_only(137).unwrap();
        assert_eq!(pool.cached_handles(), 1);

        let (tx, rx) = mpsc::unbounded_channel();
        let apply = tokio::spawn(apply_chain_list_updates(
            rx,
            Arc::clone(&pool),
            initial.clone(),
        ));

        let grown =
            config_with_chains(137, &[(137, "http://127.0.0.1:1"), (1, "http://127.0.0.1:2")]);
        tx.send(grown).unwrap();
        drop(tx);
        apply.await.unwrap();

        assert_eq!(pool.cached_handles(), 0);
        assert!(pool.registry().contains(1));
        assert!(pool.registry().contains(137));
    }
}
