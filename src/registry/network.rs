//! Immutable network records and the id → record lookup table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};

/// One configured network. Immutable after load; a chain-list change
/// rebuilds the registry (and tears down the provider pool) rather
/// than mutating records in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub native_symbol: String,
    pub chain_id_hex: String,
    pub block_explorer_url: String,
}

impl Network {
    /// Explorer link for a transaction hash on this network.
    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.block_explorer_url.trim_end_matches('/'), hash)
    }
}

/// Ordered table of active networks with O(1) id lookup.
///
/// Iteration order is the config order; the balance aggregator relies
/// on it to keep row order stable across refreshes.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<Network>,
    by_id: HashMap<u64, usize>,
    default_chain_id: u64,
}

impl NetworkRegistry {
    /// Builds the registry from validated records. The default chain
    /// must be one of the records; config validation guarantees this,
    /// and the constructor re-checks so a hand-built registry cannot
    /// violate it.
    pub fn new(networks: Vec<Network>, default_chain_id: u64) -> WalletResult<Self> {
        let by_id: HashMap<u64, usize> = networks
            .iter()
            .enumerate()
            .map(|(i, n)| (n.chain_id, i))
            .collect();

        if !by_id.contains_key(&default_chain_id) {
            return Err(WalletError::UnsupportedChain(default_chain_id));
        }

        Ok(Self {
            networks,
            by_id,
            default_chain_id,
        })
    }

    /// All active networks, in config order. Restartable and
    /// side-effect free.
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn lookup(&self, chain_id: u64) -> Option<&Network> {
        self.by_id.get(&chain_id).map(|&i| &self.networks[i])
    }

    /// Like [`lookup`](Self::lookup) but with the registry-miss error
    /// attached, for call sites that must fail loudly.
    pub fn get(&self, chain_id: u64) -> WalletResult<&Network> {
        self.lookup(chain_id)
            .ok_or(WalletError::UnsupportedChain(chain_id))
    }

    pub fn contains(&self, chain_id: u64) -> bool {
        self.by_id.contains_key(&chain_id)
    }

    /// The home chain: where the marketplace contracts live and where
    /// signed operations execute.
    pub fn default_network(&self) -> &Network {
        // Presence checked in the constructor.
        &self.networks[self.by_id[&self.default_chain_id]]
    }

    pub fn default_chain_id(&self) -> u64 {
        self.default_chain_id
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(chain_id: u64, name: &str) -> Network {
        Network {
            chain_id,
            name: name.to_string(),
            rpc_url: format!("http://localhost:{chain_id}"),
            native_symbol: "ETH".to_string(),
            chain_id_hex: format!("{chain_id:#x}"),
            block_explorer_url: "https://example.org".to_string(),
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = NetworkRegistry::new(
            vec![sample(137, "Polygon"), sample(1, "Ethereum")],
            137,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.networks()[0].chain_id, 137);
        assert_eq!(registry.networks()[1].chain_id, 1);
        assert_eq!(registry.lookup(1).unwrap().name, "Ethereum");
        assert!(registry.lookup(42).is_none());
    }

    #[test]
    fn test_get_miss_is_unsupported_chain() {
        let registry = NetworkRegistry::new(vec![sample(137, "Polygon")], 137).unwrap();
        match registry.get(10) {
            Err(WalletError::UnsupportedChain(10)) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_default_must_be_active() {
        let err = NetworkRegistry::new(vec![sample(1, "Ethereum")], 137);
        assert!(err.is_err());

        let ok = NetworkRegistry::new(vec![sample(137, "Polygon")], 137).unwrap();
        assert_eq!(ok.default_network().chain_id, 137);
    }

    #[test]
    fn test_tx_url() {
        let mut net = sample(137, "Polygon");
        net.block_explorer_url = "https://polygonscan.com/".to_string();
        assert_eq!(net.tx_url("0xabc"), "https://polygonscan.com/tx/0xabc");
    }
}
