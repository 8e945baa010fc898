//! Fee quoting over live endpoints, without any session.

use std::sync::Arc;
use std::time::Duration;

use marketplace_wallet::auth::SessionlessAuth;
use marketplace_wallet::config::GasConfig;
use marketplace_wallet::registry::{Network, NetworkRegistry};
use marketplace_wallet::transactions::{fees, OperationKind};
use marketplace_wallet::ProviderPool;

mod common;

/// Pool whose home chain quotes a flat 30 gwei. No signer anywhere.
async fn quoting_pool() -> Arc<ProviderPool> {
    let node = common::start_mock_node(|method, _params| async move {
        match method.as_str() {
            "eth_gasPrice" => Some(common::hex_u128(30_000_000_000)),
            _ => None,
        }
    })
    .await;

    let network = Network {
        chain_id: 137,
        name: "Polygon".to_string(),
        rpc_url: common::rpc_url(node),
        native_symbol: "POL".to_string(),
        chain_id_hex: "0x89".to_string(),
        block_explorer_url: String::new(),
    };
    let registry = NetworkRegistry::new(vec![network], 137).unwrap();
    Arc::new(ProviderPool::new(
        registry,
        Arc::new(SessionlessAuth),
        Duration::from_secs(1),
    ))
}

#[tokio::test]
async fn test_mint_estimate_scales_with_quantity() {
    let pool = quoting_pool().await;
    let gas = GasConfig::default();

    // 30 gwei across the default 1.2M budget is 0.036 per edition.
    let single = fees::estimate_max_fee(&pool, &gas, OperationKind::Mint, 1)
        .await
        .unwrap();
    assert_eq!(single, "0.036");

    let batch = fees::estimate_max_fee(&pool, &gas, OperationKind::Mint, 3)
        .await
        .unwrap();
    assert_eq!(batch, "0.108");
}

#[tokio::test]
async fn test_single_shot_kinds_ignore_quantity() {
    let pool = quoting_pool().await;
    let gas = GasConfig::default();

    let one = fees::estimate_max_fee(&pool, &gas, OperationKind::Buy, 1)
        .await
        .unwrap();
    let five = fees::estimate_max_fee(&pool, &gas, OperationKind::Buy, 5)
        .await
        .unwrap();
    assert_eq!(one, five);
    assert_eq!(one, "0.036");
}

#[tokio::test]
async fn test_budget_override_changes_estimate() {
    let pool = quoting_pool().await;
    let mut gas = GasConfig::default();
    gas.budget_overrides.insert("buy".to_string(), 500_000);

    let quote = fees::estimate_max_fee(&pool, &gas, OperationKind::Buy, 1)
        .await
        .unwrap();
    assert_eq!(quote, "0.015");

    // Kinds without an override keep the flat default.
    let mint = fees::estimate_max_fee(&pool, &gas, OperationKind::Mint, 1)
        .await
        .unwrap();
    assert_eq!(mint, "0.036");
}

#[tokio::test]
async fn test_gas_price_keeps_full_precision() {
    let pool = quoting_pool().await;

    // 30 gwei would be flattened to zero by six-digit formatting.
    let price = fees::current_gas_price(&pool).await.unwrap();
    assert_eq!(price, "0.00000003");
}
