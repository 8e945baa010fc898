//! Operation kinds and their gas budgets.

use std::fmt;

use crate::config::GasConfig;

/// Every chain-mutating operation the wallet can perform.
///
/// Each kind maps to exactly one contract method (or, for
/// `SendNative`, a plain value transfer) and carries a fixed gas
/// budget from config. The set is closed: new operations are new
/// variants, not runtime strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// List a token on the marketplace at a fixed price.
    List,
    /// Change the price of an existing listing.
    UpdateListing,
    /// Take a listing down.
    CancelListing,
    /// Buy a listed token, sending the asking price as value.
    Buy,
    /// Mint a new token with a metadata URI and royalty.
    Mint,
    /// Destroy a token.
    Burn,
    /// Move a token to another account.
    Transfer,
    /// Record a royalty for a token on the marketplace.
    RegisterRoyalty,
    /// Grant the marketplace operator rights over the caller's tokens.
    ApproveMarketplace,
    /// Send native currency to an address.
    SendNative,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::List,
        OperationKind::UpdateListing,
        OperationKind::CancelListing,
        OperationKind::Buy,
        OperationKind::Mint,
        OperationKind::Burn,
        OperationKind::Transfer,
        OperationKind::RegisterRoyalty,
        OperationKind::ApproveMarketplace,
        OperationKind::SendNative,
    ];

    /// Key used in `[gas.budget_overrides]` and in metric labels.
    pub fn config_key(self) -> &'static str {
        match self {
            OperationKind::List => "list",
            OperationKind::UpdateListing => "update_listing",
            OperationKind::CancelListing => "cancel_listing",
            OperationKind::Buy => "buy",
            OperationKind::Mint => "mint",
            OperationKind::Burn => "burn",
            OperationKind::Transfer => "transfer",
            OperationKind::RegisterRoyalty => "register_royalty",
            OperationKind::ApproveMarketplace => "approve_marketplace",
            OperationKind::SendNative => "send_native",
        }
    }

    /// Reverse of [`config_key`](Self::config_key), for config validation.
    pub fn from_config_key(key: &str) -> Option<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.config_key() == key)
    }

    /// Gas limit for this kind: the per-kind override when configured,
    /// otherwise the flat default budget.
    pub fn gas_budget(self, gas: &GasConfig) -> u64 {
        gas.budget_overrides
            .get(self.config_key())
            .copied()
            .unwrap_or(gas.default_budget)
    }

    /// Whether fee estimates multiply by a caller-supplied quantity.
    ///
    /// Minting and listing run once per edition; everything else is a
    /// single transaction regardless of how many tokens are involved.
    pub fn scales_with_quantity(self) -> bool {
        matches!(self, OperationKind::Mint | OperationKind::List)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_key_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_config_key(kind.config_key()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert_eq!(OperationKind::from_config_key("stake"), None);
        assert_eq!(OperationKind::from_config_key(""), None);
        assert_eq!(OperationKind::from_config_key("Mint"), None);
    }

    #[test]
    fn test_budget_falls_back_to_default() {
        let gas = GasConfig::default();
        assert_eq!(OperationKind::Buy.gas_budget(&gas), gas.default_budget);
    }

    #[test]
    fn test_budget_override_wins() {
        let mut gas = GasConfig::default();
        gas.budget_overrides.insert("mint".to_string(), 550_000);
        assert_eq!(OperationKind::Mint.gas_budget(&gas), 550_000);
        assert_eq!(OperationKind::Burn.gas_budget(&gas), gas.default_budget);
    }

    #[test]
    fn test_quantity_scaling_kinds() {
        assert!(OperationKind::Mint.scales_with_quantity());
        assert!(OperationKind::List.scales_with_quantity());
        assert!(!OperationKind::Buy.scales_with_quantity());
        assert!(!OperationKind::SendNative.scales_with_quantity());
    }
}
