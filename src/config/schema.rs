//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! wallet layer. All types derive Serde traits for deserialization
//! from config files.

use std::collections::HashMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::WalletResult;
use crate::registry::{KnownChain, Network, NetworkRegistry};

/// Root configuration for the wallet layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Active networks and the home chain.
    pub networks: NetworksConfig,

    /// Marketplace contract pair on the home chain.
    pub contracts: ContractsConfig,

    /// Gas budgets and pricing.
    pub gas: GasConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Durable key-value store settings.
    pub storage: StorageConfig,

    /// Custodial auth settings (development signer).
    pub auth: AuthConfig,

    /// Token metadata fetching.
    pub metadata: MetadataConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl WalletConfig {
    /// Fills derivable network fields from the known-chain table so a
    /// minimal entry (chain_id + rpc_url) becomes a complete record.
    /// Unknown ids are left untouched for validation to reject.
    pub fn normalize(&mut self) {
        for net in &mut self.networks.active {
            if let Some(chain) = KnownChain::from_id(net.chain_id) {
                if net.name.is_empty() {
                    net.name = chain.canonical_name().to_string();
                }
                if net.native_symbol.is_empty() {
                    net.native_symbol = chain.native_symbol().to_string();
                }
                if net.chain_id_hex.is_empty() {
                    net.chain_id_hex = chain.id_hex();
                }
            }
        }
    }

    /// Registry over the active networks. Fails only when the home
    /// chain is not among them, which validation already rejects.
    pub fn build_registry(&self) -> WalletResult<NetworkRegistry> {
        let networks = self
            .networks
            .active
            .iter()
            .cloned()
            .map(NetworkConfig::into_network)
            .collect();
        NetworkRegistry::new(networks, self.networks.home_chain_id)
    }
}

/// Network table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworksConfig {
    /// Chain hosting the marketplace contracts; signed operations and
    /// the signing provider are bound to it.
    pub home_chain_id: u64,

    /// Networks the balance aggregator and read-only pool serve.
    pub active: Vec<NetworkConfig>,
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            home_chain_id: 137,
            active: default_networks(),
        }
    }
}

/// One configured network entry. Everything except `chain_id` and
/// `rpc_url` can be derived from the known-chain table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub chain_id: u64,

    pub rpc_url: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub native_symbol: String,

    /// Hex form (`0x89` style). Derived from chain_id when omitted.
    #[serde(default)]
    pub chain_id_hex: String,

    #[serde(default)]
    pub block_explorer_url: String,
}

impl NetworkConfig {
    pub fn into_network(self) -> Network {
        Network {
            chain_id: self.chain_id,
            name: self.name,
            rpc_url: self.rpc_url,
            native_symbol: self.native_symbol,
            chain_id_hex: self.chain_id_hex,
            block_explorer_url: self.block_explorer_url,
        }
    }
}

fn default_networks() -> Vec<NetworkConfig> {
    fn entry(chain: KnownChain, rpc_url: &str, explorer: &str) -> NetworkConfig {
        NetworkConfig {
            chain_id: chain.id(),
            rpc_url: rpc_url.to_string(),
            name: chain.canonical_name().to_string(),
            native_symbol: chain.native_symbol().to_string(),
            chain_id_hex: chain.id_hex(),
            block_explorer_url: explorer.to_string(),
        }
    }

    vec![
        entry(
            KnownChain::Polygon,
            "https://polygon-rpc.com",
            "https://polygonscan.com",
        ),
        entry(KnownChain::Ethereum, "https://eth.llamarpc.com", "https://etherscan.io"),
        entry(KnownChain::Base, "https://mainnet.base.org", "https://basescan.org"),
        entry(
            KnownChain::Arbitrum,
            "https://arb1.arbitrum.io/rpc",
            "https://arbiscan.io",
        ),
        entry(
            KnownChain::Optimism,
            "https://mainnet.optimism.io",
            "https://optimistic.etherscan.io",
        ),
    ]
}

/// Marketplace contract pair. Both addresses empty means a read-only
/// deployment: balances and views work, signed operations are not
/// constructed at all.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractsConfig {
    /// NFT token contract (mint/burn/transfer/approval surface).
    pub token_address: String,

    /// Marketplace contract (listings, purchases, royalties).
    pub marketplace_address: String,
}

impl ContractsConfig {
    pub fn is_configured(&self) -> bool {
        !self.token_address.is_empty() && !self.marketplace_address.is_empty()
    }

    /// Parsed address pair, `None` for a read-only deployment.
    /// Validation guarantees the strings parse when present.
    pub fn pair(&self) -> Option<ContractPair> {
        if !self.is_configured() {
            return None;
        }
        let token = self.token_address.parse().ok()?;
        let marketplace = self.marketplace_address.parse().ok()?;
        Some(ContractPair { token, marketplace })
    }
}

/// Checked contract addresses handed to the transaction orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractPair {
    pub token: Address,
    pub marketplace: Address,
}

/// Gas budgets and pricing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Fixed gas budget attached to every operation kind without an
    /// override. Deliberately generous instead of estimated per call.
    pub default_budget: u64,

    /// Per-kind budget overrides, keyed by kind name
    /// (e.g. `mint = 900000`).
    pub budget_overrides: HashMap<String, u64>,

    /// Current gas price is scaled by this before submission.
    pub price_multiplier: f64,

    /// Used when the node refuses to quote a gas price.
    pub fallback_price_wei: u64,

    /// Marketplace fee in basis points, grossed up onto listing prices.
    pub marketplace_fee_bps: u32,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            default_budget: 1_200_000,
            budget_overrides: HashMap::new(),
            price_multiplier: 1.5,
            fallback_price_wei: 300_000_000_000,
            marketplace_fee_bps: 5,
        }
    }
}

/// Timeout configuration for chain operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-request RPC timeout in seconds. Also bounds each network's
    /// query inside a balance pass.
    pub rpc_secs: u64,

    /// Receipt polling interval in seconds.
    pub confirmation_poll_secs: u64,

    /// Total time to wait for a transaction receipt in seconds.
    pub confirmation_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            rpc_secs: 10,
            confirmation_poll_secs: 2,
            confirmation_secs: 180,
        }
    }
}

/// Durable key-value store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON store persisting UI state such as the selected
    /// viewing chain.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "wallet-store.json".to_string(),
        }
    }
}

/// Custodial auth settings for the built-in development signer.
/// Production embeds its own `CustodialAuth` implementation and
/// ignores this section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding the development private key.
    pub private_key_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            private_key_env: "WALLET_PRIVATE_KEY".to_string(),
        }
    }
}

/// Token metadata fetching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Gateway prefix substituted for `ipfs://` URIs.
    pub ipfs_gateway: String,

    /// HTTP timeout for metadata fetches in seconds.
    pub http_timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
            http_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WalletConfig::default();
        assert_eq!(config.networks.home_chain_id, 137);
        assert_eq!(config.networks.active.len(), 5);
        assert_eq!(config.gas.default_budget, 1_200_000);
        assert_eq!(config.gas.price_multiplier, 1.5);
        assert_eq!(config.timeouts.rpc_secs, 10);
        assert!(!config.contracts.is_configured());
        assert!(config.contracts.pair().is_none());
    }

    #[test]
    fn test_minimal_entry_normalizes() {
        let mut config = WalletConfig::default();
        config.networks.active = vec![NetworkConfig {
            chain_id: 8453,
            rpc_url: "https://mainnet.base.org".to_string(),
            name: String::new(),
            native_symbol: String::new(),
            chain_id_hex: String::new(),
            block_explorer_url: String::new(),
        }];
        config.normalize();

        let net = &config.networks.active[0];
        assert_eq!(net.name, "Base");
        assert_eq!(net.native_symbol, "ETH");
        assert_eq!(net.chain_id_hex, "0x2105");
    }

    #[test]
    fn test_contract_pair_parses() {
        let contracts = ContractsConfig {
            token_address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
            marketplace_address: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
        };
        let pair = contracts.pair().unwrap();
        assert_ne!(pair.token, pair.marketplace);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_src = r#"
            [networks]
            home_chain_id = 137

            [[networks.active]]
            chain_id = 137
            rpc_url = "http://localhost:8545"

            [gas]
            default_budget = 900000

            [gas.budget_overrides]
            mint = 500000
        "#;
        let mut config: WalletConfig = toml::from_str(toml_src).unwrap();
        config.normalize();

        assert_eq!(config.networks.active.len(), 1);
        assert_eq!(config.networks.active[0].name, "Polygon");
        assert_eq!(config.gas.default_budget, 900_000);
        assert_eq!(config.gas.budget_overrides["mint"], 500_000);
        // Untouched sections keep their defaults.
        assert_eq!(config.timeouts.confirmation_secs, 180);
    }
}
