//! Two-stage transaction progress.
//!
//! Submission hands back a [`SubmittedTx`]; waiting for inclusion is a
//! separate await on [`SubmittedTx::confirmed`]. The type makes the
//! ordering structural: a confirmed stage can only be reached through
//! a value the submitted stage produced.

use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionReceipt;
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{WalletError, WalletResult};
use crate::observability::metrics;
use crate::providers::ReadOnlyHandle;
use crate::transactions::request::OperationKind;

/// A transaction the node has accepted into its pool. Holds everything
/// needed to poll for the receipt; dropping it abandons tracking but
/// not the transaction itself.
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    hash: TxHash,
    op_id: Uuid,
    kind: OperationKind,
    reader: ReadOnlyHandle,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl SubmittedTx {
    pub(crate) fn new(
        hash: TxHash,
        op_id: Uuid,
        kind: OperationKind,
        reader: ReadOnlyHandle,
        poll_interval: Duration,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            hash,
            op_id,
            kind,
            reader,
            poll_interval,
            confirmation_timeout,
        }
    }

    /// Hash the node accepted the transaction under.
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Identifier assigned when the operation was prepared, for
    /// correlating log lines across both stages.
    pub fn op_id(&self) -> Uuid {
        self.op_id
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn chain_id(&self) -> u64 {
        self.reader.chain_id()
    }

    /// Wait until the transaction is mined and return its receipt.
    ///
    /// Polls the chain on a fixed interval. A reverted execution is an
    /// error even though a receipt exists; transient polling failures
    /// are retried until the overall deadline. Safe to call again
    /// after an error, the transaction may still confirm later.
    pub async fn confirmed(&self) -> WalletResult<TransactionReceipt> {
        debug!(
            op_id = %self.op_id,
            kind = %self.kind,
            hash = %self.hash,
            "Waiting for confirmation"
        );

        let outcome = timeout(self.confirmation_timeout, async {
            let mut ticker = interval(self.poll_interval);
            loop {
                ticker.tick().await;
                let receipt = match self.reader.get_transaction_receipt(self.hash).await {
                    Ok(Some(receipt)) => receipt,
                    Ok(None) => continue,
                    Err(e) => {
                        // One failed poll is not a verdict on the tx.
                        warn!(hash = %self.hash, error = %e, "Receipt poll failed, retrying");
                        continue;
                    }
                };
                return receipt;
            }
        })
        .await;

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(_) => {
                metrics::record_tx(self.kind.config_key(), "timeout");
                return Err(WalletError::ContractCallFailed(format!(
                    "transaction {} not confirmed after {}s",
                    self.hash,
                    self.confirmation_timeout.as_secs()
                )));
            }
        };

        if !receipt.status() {
            metrics::record_tx(self.kind.config_key(), "reverted");
            warn!(
                op_id = %self.op_id,
                kind = %self.kind,
                hash = %self.hash,
                "Transaction reverted"
            );
            return Err(WalletError::ContractCallFailed(format!(
                "transaction {} reverted",
                self.hash
            )));
        }

        metrics::record_tx(self.kind.config_key(), "confirmed");
        info!(
            op_id = %self.op_id,
            kind = %self.kind,
            hash = %self.hash,
            block = receipt.block_number.unwrap_or_default(),
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}
