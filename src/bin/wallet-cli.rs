use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use clap::{Parser, Subcommand};
use marketplace_wallet::auth::{CustodialAuth, LocalKeyAuth, SessionlessAuth};
use marketplace_wallet::balances::BalanceAggregator;
use marketplace_wallet::config::loader::load_config;
use marketplace_wallet::config::WalletConfig;
use marketplace_wallet::observability::logging::init_tracing;
use marketplace_wallet::providers::ProviderPool;
use marketplace_wallet::registry::KnownChain;
use marketplace_wallet::storage::KvStore;
use marketplace_wallet::tokens::TokenInventory;
use marketplace_wallet::transactions::{fees, OperationKind};

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Read-only wallet inspection across the marketplace chains", long_about = None)]
struct Cli {
    /// Config file (TOML). Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active networks
    Networks,
    /// Fetch native balances for an address on every active network
    Balances { address: Address },
    /// Current home-chain gas price in native units
    GasPrice,
    /// Worst-case fee for an operation kind
    EstimateFee {
        kind: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// List the tokens an address owns on the home chain
    Tokens { address: Address },
    /// Look up a transaction on the home chain
    Tx { hash: TxHash },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };
    init_tracing(&config.observability.log_level);

    match cli.command {
        Commands::Networks => {
            let registry = config.build_registry()?;
            let home = registry.default_chain_id();
            for network in registry.networks() {
                let marker = if network.chain_id == home { "*" } else { " " };
                let testnet = KnownChain::from_id(network.chain_id)
                    .is_some_and(|chain| chain.is_testnet());
                println!(
                    "{} {:>8}  {:<16} {:<6} {}{}",
                    marker,
                    network.chain_id,
                    network.name,
                    network.native_symbol,
                    network.rpc_url,
                    if testnet { "  (testnet)" } else { "" }
                );
            }
        }
        Commands::Balances { address } => {
            let pool = build_pool(&config)?;
            let store = KvStore::load_from_file(Path::new(&config.storage.path))?;
            let aggregator = BalanceAggregator::new(pool, store);
            for entry in aggregator.refresh_all_balances(address).await {
                match &entry.error {
                    Some(reason) => println!(
                        "{:>8}  {:<16} unavailable ({})",
                        entry.chain_id, entry.chain_name, reason
                    ),
                    None => println!(
                        "{:>8}  {:<16} {:>24} {}",
                        entry.chain_id, entry.chain_name, entry.balance, entry.symbol
                    ),
                }
            }
        }
        Commands::GasPrice => {
            let pool = build_pool(&config)?;
            let symbol = pool.registry().default_network().native_symbol.clone();
            let price = fees::current_gas_price(&pool).await?;
            println!("{} {}", price, symbol);
        }
        Commands::EstimateFee { kind, quantity } => {
            let kind = OperationKind::from_config_key(&kind).ok_or_else(|| {
                let known: Vec<&str> = OperationKind::ALL
                    .iter()
                    .map(|k| k.config_key())
                    .collect();
                format!("unknown operation '{}'; expected one of: {}", kind, known.join(", "))
            })?;
            let pool = build_pool(&config)?;
            let symbol = pool.registry().default_network().native_symbol.clone();
            let fee = fees::estimate_max_fee(&pool, &config.gas, kind, quantity).await?;
            println!("{} {}", fee, symbol);
        }
        Commands::Tokens { address } => {
            let pair = config
                .contracts
                .pair()
                .ok_or("token contract not configured; set [contracts] in the config file")?;
            let pool = build_pool(&config)?;
            let inventory = TokenInventory::new(
                pool,
                pair.token,
                &config.metadata,
                Duration::from_secs(config.timeouts.rpc_secs),
            );
            let tokens = inventory.owned_tokens(address).await?;
            if tokens.is_empty() {
                println!("no tokens");
            }
            for token in tokens {
                println!(
                    "{:>8}  {:<24} {}",
                    token.token_id,
                    token.metadata.name.as_deref().unwrap_or("-"),
                    token.uri
                );
            }
        }
        Commands::Tx { hash } => {
            let pool = build_pool(&config)?;
            let home = pool.registry().default_network().clone();
            let reader = pool.read_only(home.chain_id)?;
            match reader.get_transaction_receipt(hash).await? {
                Some(receipt) => {
                    let outcome = if receipt.status() { "confirmed" } else { "reverted" };
                    println!(
                        "{} in block {}",
                        outcome,
                        receipt.block_number.unwrap_or_default()
                    );
                    if !home.block_explorer_url.is_empty() {
                        println!("{}", home.tx_url(&hash.to_string()));
                    }
                }
                None => println!("pending or unknown"),
            }
        }
    }

    Ok(())
}

fn build_pool(config: &WalletConfig) -> Result<Arc<ProviderPool>, Box<dyn std::error::Error>> {
    let registry = config.build_registry()?;
    // A signer is optional here; every subcommand is read-only.
    let auth: Arc<dyn CustodialAuth> = match LocalKeyAuth::from_env(&config.auth.private_key_env) {
        Ok(local) => Arc::new(local),
        Err(_) => Arc::new(SessionlessAuth),
    };
    Ok(Arc::new(ProviderPool::new(
        registry,
        auth,
        Duration::from_secs(config.timeouts.rpc_secs),
    )))
}
