//! Gas price scaling, marketplace fee arithmetic and fee quoting.

use alloy::primitives::U256;

use crate::balances::format_native_exact;
use crate::config::GasConfig;
use crate::error::WalletResult;
use crate::providers::ProviderPool;
use crate::transactions::request::OperationKind;

/// Scale a quoted gas price by the configured multiplier, rounding
/// down. The headroom keeps transactions from stalling when the base
/// fee moves between the quote and the submission.
pub fn scale_gas_price(quoted_wei: u128, multiplier: f64) -> u128 {
    (quoted_wei as f64 * multiplier).floor() as u128
}

/// Add the marketplace's buyer fee to a seller price, in basis points.
/// The listed price is what the buyer pays; the fee share is carved
/// out of it on chain.
pub fn gross_up(price_wei: U256, fee_bps: u32) -> U256 {
    price_wei + price_wei * U256::from(fee_bps) / U256::from(10_000u64)
}

/// Worst-case fee for an operation: the full gas budget at the given
/// price, once per unit of quantity. Actual usage is normally far
/// lower; the estimate is a ceiling for affordance checks, not a
/// prediction.
pub fn max_fee_wei(gas_price_wei: u128, gas_budget: u64, quantity: u32) -> U256 {
    U256::from(gas_price_wei) * U256::from(gas_budget) * U256::from(quantity.max(1))
}

/// Current home-chain gas price as a native-unit decimal string.
/// Needs neither a session nor configured contracts.
pub async fn current_gas_price(pool: &ProviderPool) -> WalletResult<String> {
    let reader = pool.read_only(pool.home_chain_id())?;
    let gas_price = reader.get_gas_price().await?;
    Ok(format_native_exact(U256::from(gas_price)))
}

/// Worst-case fee for an operation as a native-unit decimal string.
/// Quantity multiplies the estimate for kinds that run once per
/// edition; other kinds ignore it.
pub async fn estimate_max_fee(
    pool: &ProviderPool,
    gas: &GasConfig,
    kind: OperationKind,
    quantity: u32,
) -> WalletResult<String> {
    let reader = pool.read_only(pool.home_chain_id())?;
    let gas_price = reader.get_gas_price().await?;
    let units = if kind.scales_with_quantity() {
        quantity
    } else {
        1
    };
    Ok(format_native_exact(max_fee_wei(
        gas_price,
        kind.gas_budget(gas),
        units,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_gas_price_floors() {
        assert_eq!(scale_gas_price(100, 1.5), 150);
        assert_eq!(scale_gas_price(3, 1.5), 4);
        assert_eq!(scale_gas_price(0, 1.5), 0);
    }

    #[test]
    fn test_scale_gas_price_identity_multiplier() {
        assert_eq!(scale_gas_price(30_000_000_000, 1.0), 30_000_000_000);
    }

    #[test]
    fn test_gross_up_five_bps() {
        // 1 native unit at 5 bps picks up 0.0005.
        let one = U256::from(10u64).pow(U256::from(18u64));
        let grossed = gross_up(one, 5);
        assert_eq!(grossed, one + U256::from(500_000_000_000_000u64));
    }

    #[test]
    fn test_gross_up_zero_fee_is_identity() {
        let price = U256::from(123_456_789u64);
        assert_eq!(gross_up(price, 0), price);
    }

    #[test]
    fn test_gross_up_rounds_down_on_tiny_prices() {
        // 5 bps of 100 wei is 0.05 wei, which truncates away.
        assert_eq!(gross_up(U256::from(100u64), 5), U256::from(100u64));
    }

    #[test]
    fn test_max_fee_scales_with_quantity() {
        let single = max_fee_wei(30_000_000_000, 1_200_000, 1);
        let batch = max_fee_wei(30_000_000_000, 1_200_000, 4);
        assert_eq!(batch, single * U256::from(4u64));
    }

    #[test]
    fn test_max_fee_zero_quantity_counts_as_one() {
        let single = max_fee_wei(1_000, 21_000, 1);
        assert_eq!(max_fee_wei(1_000, 21_000, 0), single);
    }
}
