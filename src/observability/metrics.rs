//! Metrics collection.
//!
//! # Metrics
//! - `wallet_balance_passes_total` (counter): refresh passes by outcome
//!   (published, superseded, short_circuit)
//! - `wallet_balance_queries_total` (counter): per-chain queries by
//!   chain_id and outcome (ok, error)
//! - `wallet_tx_total` (counter): submissions by kind and outcome
//!   (submitted, confirmed, reverted, rejected, timeout)
//! - `wallet_session_logins_total` (counter): custodial logins by
//!   outcome (ok, failed, refreshed)
//! - `wallet_provider_handles` (gauge): cached read-only handles
//! - `wallet_store_entries` (gauge): key-value store size
//!
//! # Design Decisions
//! - Everything goes through the `metrics` facade; recorder
//!   installation is left to the embedding application
//! - Low-overhead updates (atomic operations)

pub fn record_balance_pass(outcome: &'static str) {
    metrics::counter!("wallet_balance_passes_total", "outcome" => outcome).increment(1);
}

pub fn record_balance_query(chain_id: u64, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!(
        "wallet_balance_queries_total",
        "chain_id" => chain_id.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_tx(kind: &'static str, outcome: &'static str) {
    metrics::counter!("wallet_tx_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_login(outcome: &'static str) {
    metrics::counter!("wallet_session_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_provider_handles(count: usize) {
    metrics::gauge!("wallet_provider_handles").set(count as f64);
}

pub fn record_store_size(count: usize) {
    metrics::gauge!("wallet_store_entries").set(count as f64);
}
