//! Signed operations end to end against scripted nodes: submission,
//! confirmation polling, and the exact envelopes that hit the wire.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, hex, Address, TxKind, U256};
use alloy::sol_types::SolCall;
use serde_json::json;

use marketplace_wallet::auth::{CustodialAuth, LocalKeyAuth, SessionlessAuth};
use marketplace_wallet::config::{ContractPair, GasConfig, TimeoutConfig};
use marketplace_wallet::registry::{Network, NetworkRegistry};
use marketplace_wallet::transactions::contracts::Marketplace;
use marketplace_wallet::transactions::OperationKind;
use marketplace_wallet::{ProviderPool, TransactionOrchestrator, WalletError};

mod common;

const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
const MARKETPLACE: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

/// Node scripted for one signed flow: quotes 30 gwei, hands out nonce
/// 7, accepts raw submissions and serves their receipts.
async fn scripted_node(
    success: bool,
    sends: Arc<AtomicU32>,
    captured: Arc<Mutex<Option<String>>>,
) -> SocketAddr {
    common::start_mock_node(move |method, params| {
        let sends = sends.clone();
        let captured = captured.clone();
        async move {
            match method.as_str() {
                "eth_chainId" => Some(json!("0x89")),
                "eth_gasPrice" => Some(common::hex_u128(30_000_000_000)),
                "eth_getTransactionCount" => Some(json!("0x7")),
                "eth_sendRawTransaction" => {
                    sends.fetch_add(1, Ordering::SeqCst);
                    *captured.lock().unwrap() = params[0].as_str().map(String::from);
                    Some(common::raw_tx_hash(&params))
                }
                "eth_getTransactionReceipt" => Some(common::receipt_for(&params, success)),
                _ => None,
            }
        }
    })
    .await
}

fn dev_auth() -> Arc<dyn CustodialAuth> {
    Arc::new(LocalKeyAuth::from_private_key(DEV_KEY).unwrap())
}

fn orchestrator_at(rpc_url: String, auth: Arc<dyn CustodialAuth>) -> TransactionOrchestrator {
    let network = Network {
        chain_id: 137,
        name: "Polygon".to_string(),
        rpc_url,
        native_symbol: "POL".to_string(),
        chain_id_hex: "0x89".to_string(),
        block_explorer_url: String::new(),
    };
    let registry = NetworkRegistry::new(vec![network], 137).unwrap();
    let pool = Arc::new(ProviderPool::new(registry, auth, Duration::from_secs(2)));
    TransactionOrchestrator::new(
        pool,
        ContractPair {
            token: TOKEN,
            marketplace: MARKETPLACE,
        },
        GasConfig::default(),
        TimeoutConfig {
            rpc_secs: 2,
            confirmation_poll_secs: 1,
            confirmation_secs: 10,
        },
    )
}

fn decode_legacy(captured: &Arc<Mutex<Option<String>>>) -> alloy::consensus::TxLegacy {
    let raw = captured.lock().unwrap().take().expect("node saw no submission");
    let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap();
    let envelope = TxEnvelope::decode_2718(&mut bytes.as_slice()).unwrap();
    let TxEnvelope::Legacy(signed) = envelope else {
        panic!("fixed-gas-price submissions go out as legacy transactions");
    };
    signed.tx().clone()
}

#[tokio::test]
async fn test_mint_submits_and_confirms() {
    let sends = Arc::new(AtomicU32::new(0));
    let node = scripted_node(true, sends.clone(), Arc::new(Mutex::new(None))).await;

    let orch = orchestrator_at(common::rpc_url(node), dev_auth());
    let to = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    let submitted = orch
        .mint("artist@example.org", to, "ipfs://QmMintUri", 10)
        .await
        .unwrap();
    assert_eq!(submitted.kind(), OperationKind::Mint);
    assert_eq!(submitted.chain_id(), 137);
    assert_eq!(sends.load(Ordering::SeqCst), 1);

    let receipt = submitted.confirmed().await.unwrap();
    assert!(receipt.status());
    assert_eq!(receipt.transaction_hash, submitted.hash());
}

#[tokio::test]
async fn test_reverted_receipt_is_an_error() {
    let node = scripted_node(
        false,
        Arc::new(AtomicU32::new(0)),
        Arc::new(Mutex::new(None)),
    )
    .await;

    let orch = orchestrator_at(common::rpc_url(node), dev_auth());
    let submitted = orch
        .burn("artist@example.org", U256::from(3u64))
        .await
        .unwrap();

    let err = submitted.confirmed().await.unwrap_err();
    match err {
        WalletError::ContractCallFailed(reason) => assert!(reason.contains("reverted")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_nothing_reaches_the_chain_without_a_session() {
    let hits = Arc::new(AtomicU32::new(0));
    let h = hits.clone();
    let node = common::start_mock_node(move |_method, _params| {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            None
        }
    })
    .await;

    let orch = orchestrator_at(common::rpc_url(node), Arc::new(SessionlessAuth));
    let err = orch
        .transfer("artist@example.org", Address::ZERO, U256::from(1u64))
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::Unauthenticated(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0, "auth runs before any RPC");
}

#[tokio::test]
async fn test_listing_envelope_is_priced_and_grossed_up() {
    let captured = Arc::new(Mutex::new(None));
    let node = scripted_node(true, Arc::new(AtomicU32::new(0)), captured.clone()).await;

    let orch = orchestrator_at(common::rpc_url(node), dev_auth());
    let ask = U256::from(1_000_000_000_000_000_000u128);
    orch.list("artist@example.org", U256::from(42u64), ask, 0)
        .await
        .unwrap();

    let tx = decode_legacy(&captured);
    assert_eq!(tx.chain_id, Some(137));
    assert_eq!(tx.nonce, 7);
    assert_eq!(tx.gas_limit, 1_200_000);
    // 30 gwei quoted, 1.5x headroom applied.
    assert_eq!(tx.gas_price, 45_000_000_000);
    assert_eq!(tx.to, TxKind::Call(MARKETPLACE));

    let call = Marketplace::listItemCall::abi_decode(&tx.input).unwrap();
    assert_eq!(call.nftAddress, TOKEN);
    assert_eq!(call.tokenId, U256::from(42u64));
    assert_eq!(call.quantity, U256::from(1u64));
    // The 5 bps buyer fee lands on top of a 1-unit ask.
    assert_eq!(
        call.pricePerItem,
        U256::from(1_000_500_000_000_000_000u128)
    );
    assert_eq!(call.startingTime, U256::ZERO);
}

#[tokio::test]
async fn test_native_send_is_a_plain_value_transfer() {
    let captured = Arc::new(Mutex::new(None));
    let node = scripted_node(true, Arc::new(AtomicU32::new(0)), captured.clone()).await;

    let orch = orchestrator_at(common::rpc_url(node), dev_auth());
    let to = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    let amount = U256::from(250_000_000_000_000_000u128);
    orch.send_native("artist@example.org", to, amount)
        .await
        .unwrap();

    let tx = decode_legacy(&captured);
    assert_eq!(tx.to, TxKind::Call(to));
    assert_eq!(tx.value, amount);
    assert!(tx.input.is_empty());
    assert_eq!(tx.gas_limit, 1_200_000);
}
