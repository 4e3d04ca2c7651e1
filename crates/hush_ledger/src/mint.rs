//! Mint orchestration: one attempt per invocation, strictly sequential.
//!
//! Flow: resolve recipient, scale amount, snapshot balance, submit, await
//! finality, re-snapshot balance, classify. Validation failures raise before
//! any network interaction; every ledger-level failure becomes a
//! [`MintResult`] outcome so the caller always gets a result shape back.
//! Submission is the commit point: after it, cancellation only means "stop
//! waiting", so retries are whole-invocation affairs for the caller.

use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::abi;
use crate::address::{Address, EvmAddress};
use crate::amount::TokenAmount;
use crate::error::LedgerError;
use crate::probe::{BalanceProbe, BalanceReading};
use crate::service::{ContractCall, TransactionService, ViewQueryService};
use crate::status::classify;

/// One fully validated mint, immutable once constructed.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub recipient: EvmAddress,
    pub amount: TokenAmount,
    pub gas_limit: u64,
    pub max_fee_hbar: u64,
}

/// Terminal state of a mint attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStatus {
    Succeeded,
    Reverted,
    SubmissionFailed,
}

/// Outcome of one mint attempt. Produced once, never mutated.
#[derive(Debug, Clone)]
pub struct MintResult {
    pub status: MintStatus,
    pub transaction_ref: Option<String>,
    pub balance_before: BalanceReading,
    pub balance_after: BalanceReading,
    /// The underlying status or error message, verbatim.
    pub raw_cause: Option<String>,
    /// Best-effort classification of `raw_cause`; `None` means unclassified.
    pub guidance: Option<&'static str>,
}

/// Tunables for a mint cycle.
#[derive(Debug, Clone)]
pub struct MintOptions {
    pub token_decimals: u32,
    pub gas_limit: u64,
    pub max_fee_hbar: u64,
    /// Budget covering both suspension points (submission ack + finality).
    pub receipt_timeout: Duration,
}

impl Default for MintOptions {
    fn default() -> Self {
        Self {
            token_decimals: 18,
            gas_limit: 300_000,
            max_fee_hbar: 10,
            receipt_timeout: Duration::from_secs(120),
        }
    }
}

/// Drives one mint cycle over the collaborator services.
pub struct MintOrchestrator<'a, T, Q>
where
    T: TransactionService + ?Sized,
    Q: ViewQueryService + ?Sized,
{
    tx: &'a T,
    view: &'a Q,
    contract: EvmAddress,
    options: MintOptions,
}

impl<'a, T, Q> MintOrchestrator<'a, T, Q>
where
    T: TransactionService + ?Sized,
    Q: ViewQueryService + ?Sized,
{
    pub fn new(tx: &'a T, view: &'a Q, contract: EvmAddress, options: MintOptions) -> Self {
        Self {
            tx,
            view,
            contract,
            options,
        }
    }

    /// Resolve and validate raw inputs, then run the cycle.
    ///
    /// `Err` here means a validation failure caught before any network
    /// interaction (bad recipient format, bad amount). Everything after
    /// validation comes back as a [`MintResult`].
    pub async fn mint(&self, recipient: &str, amount: &str) -> Result<MintResult, LedgerError> {
        let recipient = Address::parse(recipient)?.to_evm();
        let amount = TokenAmount::scale(amount, self.options.token_decimals)?;
        let request = MintRequest {
            recipient,
            amount,
            gas_limit: self.options.gas_limit,
            max_fee_hbar: self.options.max_fee_hbar,
        };
        Ok(self.run(request).await)
    }

    /// Run one pre-validated mint cycle.
    pub async fn run(&self, request: MintRequest) -> MintResult {
        let probe = BalanceProbe::new(self.view, self.contract);
        let deadline = Instant::now() + self.options.receipt_timeout;

        // Pre-balance snapshot. Diagnostic only; failure never blocks.
        let balance_before = probe.query(&request.recipient).await;
        info!(
            recipient = %request.recipient,
            amount = %request.amount,
            balance_before = %balance_before,
            "starting mint"
        );

        let call = ContractCall {
            contract: self.contract,
            function: "mintReward",
            data: abi::mint_reward(&request.recipient, &request.amount),
            gas_limit: request.gas_limit,
            max_fee_hbar: request.max_fee_hbar,
        };

        let handle = match timeout_at(deadline, self.tx.submit(&call)).await {
            Err(_) => {
                return self.failed(
                    None,
                    LedgerError::Timeout(self.options.receipt_timeout),
                    balance_before,
                );
            }
            Ok(Err(cause)) => return self.failed(None, cause, balance_before),
            Ok(Ok(handle)) => handle,
        };

        let receipt = match timeout_at(deadline, self.tx.await_receipt(&handle)).await {
            Err(_) => {
                return self.failed(
                    Some(handle.tx_ref),
                    LedgerError::Timeout(self.options.receipt_timeout),
                    balance_before,
                );
            }
            Ok(Err(cause)) => return self.failed(Some(handle.tx_ref), cause, balance_before),
            Ok(Ok(receipt)) => receipt,
        };

        if !receipt.is_success() {
            warn!(status = %receipt.status, tx = %receipt.tx_ref, "mint reverted");
            // Post-balance snapshot still runs; its failure cannot worsen
            // an already terminal state.
            let balance_after = probe.query(&request.recipient).await;
            let guidance = classify(&receipt.status).guidance();
            return MintResult {
                status: MintStatus::Reverted,
                transaction_ref: Some(receipt.tx_ref),
                balance_before,
                balance_after,
                raw_cause: Some(receipt.status),
                guidance,
            };
        }

        // Best-effort execution details.
        match self.tx.get_record(&handle).await {
            Ok(record) => {
                info!(gas_used = ?record.gas_used, logs = record.log_count, "transaction record")
            }
            Err(e) => debug!(error = %e, "transaction record unavailable"),
        }

        let balance_after = probe.query(&request.recipient).await;
        info!(tx = %receipt.tx_ref, balance_after = %balance_after, "mint succeeded");
        MintResult {
            status: MintStatus::Succeeded,
            transaction_ref: Some(receipt.tx_ref),
            balance_before,
            balance_after,
            raw_cause: None,
            guidance: None,
        }
    }

    fn failed(
        &self,
        transaction_ref: Option<String>,
        cause: LedgerError,
        balance_before: BalanceReading,
    ) -> MintResult {
        // Keep the underlying message verbatim for display.
        let raw = match cause {
            LedgerError::SubmissionRejected(message) => message,
            other => other.to_string(),
        };
        warn!(cause = %raw, "mint submission failed");
        let guidance = classify(&raw).guidance();
        MintResult {
            status: MintStatus::SubmissionFailed,
            transaction_ref,
            balance_before,
            balance_after: BalanceReading::Unknown,
            raw_cause: Some(raw),
            guidance,
        }
    }
}
