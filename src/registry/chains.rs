//! Closed set of chains this build can speak to.

/// Every chain the crate understands. Config may activate any subset;
/// an id outside this set never gets past validation, so downstream
/// code can match exhaustively instead of guarding against arbitrary
/// ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownChain {
    Ethereum,
    Optimism,
    Polygon,
    Base,
    Arbitrum,
    PolygonAmoy,
}

impl KnownChain {
    /// All known chains, mainnets first.
    pub const ALL: [KnownChain; 6] = [
        KnownChain::Ethereum,
        KnownChain::Optimism,
        KnownChain::Polygon,
        KnownChain::Base,
        KnownChain::Arbitrum,
        KnownChain::PolygonAmoy,
    ];

    /// Numeric chain id.
    pub fn id(&self) -> u64 {
        match self {
            KnownChain::Ethereum => 1,
            KnownChain::Optimism => 10,
            KnownChain::Polygon => 137,
            KnownChain::Base => 8453,
            KnownChain::Arbitrum => 42161,
            KnownChain::PolygonAmoy => 80002,
        }
    }

    /// Hex form used by browser wallets (`0x89` style, no padding).
    pub fn id_hex(&self) -> String {
        format!("{:#x}", self.id())
    }

    pub fn from_id(id: u64) -> Option<Self> {
        KnownChain::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// Display name matching block explorers and wallet UIs.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            KnownChain::Ethereum => "Ethereum",
            KnownChain::Optimism => "Optimism",
            KnownChain::Polygon => "Polygon",
            KnownChain::Base => "Base",
            KnownChain::Arbitrum => "Arbitrum",
            KnownChain::PolygonAmoy => "Polygon Amoy",
        }
    }

    /// Ticker of the coin that pays for gas on this chain.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            KnownChain::Polygon | KnownChain::PolygonAmoy => "POL",
            _ => "ETH",
        }
    }

    /// Testnets are excluded from mainnet-only surfaces.
    pub fn is_testnet(&self) -> bool {
        matches!(self, KnownChain::PolygonAmoy)
    }
}
