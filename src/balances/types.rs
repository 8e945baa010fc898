//! Per-chain balance entries and native-unit formatting.

use alloy::primitives::U256;
use serde::Serialize;

use crate::registry::Network;

/// Wei per one millionth of a native unit.
const MICRO_WEI: u64 = 1_000_000_000_000;

/// Wei per native unit.
const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// One network's row in the balance view. The published set always
/// holds one entry per active network, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainBalance {
    pub chain_id: u64,
    pub chain_name: String,
    pub symbol: String,
    /// Native balance, six fractional digits. `"0"`-ish while loading
    /// or on error.
    pub balance: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ChainBalance {
    pub fn loading(network: &Network) -> Self {
        Self {
            chain_id: network.chain_id,
            chain_name: network.name.clone(),
            symbol: network.native_symbol.clone(),
            balance: "0".to_string(),
            is_loading: true,
            error: None,
        }
    }

    pub fn settled(network: &Network, balance: String) -> Self {
        Self {
            chain_id: network.chain_id,
            chain_name: network.name.clone(),
            symbol: network.native_symbol.clone(),
            balance,
            is_loading: false,
            error: None,
        }
    }

    pub fn failed(network: &Network, reason: String) -> Self {
        Self {
            chain_id: network.chain_id,
            chain_name: network.name.clone(),
            symbol: network.native_symbol.clone(),
            balance: "0".to_string(),
            is_loading: false,
            error: Some(reason),
        }
    }
}

/// Format wei as native units with six fractional digits, rounding
/// half up.
pub fn format_native(wei: U256) -> String {
    let micros = (wei + U256::from(MICRO_WEI / 2)) / U256::from(MICRO_WEI);
    // Anything past u128 micros is far beyond any real supply.
    let micros = u128::try_from(micros).unwrap_or(u128::MAX);
    format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}

/// Format wei as native units at full precision, trailing zeros
/// trimmed. Gas prices sit far below one millionth of a unit, so the
/// fixed six-digit form would show them as zero.
pub fn format_native_exact(wei: U256) -> String {
    let one: U256 = U256::from(WEI_PER_UNIT);
    let whole = wei / one;
    // The remainder is below 1e18 and always fits u128.
    let frac = u128::try_from(wei % one).unwrap_or(0);
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:018}");
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
