//! Collaborator interfaces for transaction submission and view queries.
//!
//! The orchestrator only sees these traits; the production implementation is
//! [`RelayClient`](crate::relay::RelayClient), tests use in-memory doubles.

use async_trait::async_trait;

use crate::address::EvmAddress;
use crate::error::LedgerError;

/// Receipt status string reported for a successfully executed transaction.
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// One contract invocation, fully encoded.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub contract: EvmAddress,
    /// Function name, for logs and operator-facing output only.
    pub function: &'static str,
    pub data: Vec<u8>,
    pub gas_limit: u64,
    /// Fee ceiling in whole HBAR for this call.
    pub max_fee_hbar: u64,
}

/// Opaque reference to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle {
    pub tx_ref: String,
}

/// Terminal confirmation that a transaction was ordered and executed.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub status: String,
    pub tx_ref: String,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Best-effort execution details, for diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct TransactionRecord {
    pub gas_used: Option<u64>,
    pub log_count: usize,
}

/// Submits state-changing contract calls under one signing identity.
///
/// Nonce sequencing for that identity is the implementation's concern within
/// a single service instance; callers running concurrent submissions under
/// the same identity must serialize externally.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Submit a call. Rejection (fee, nonce, malformed transaction) is
    /// reported as `SubmissionRejected` with the raw cause preserved.
    async fn submit(&self, call: &ContractCall) -> Result<SubmissionHandle, LedgerError>;

    /// Block until the ledger reports a terminal receipt. Callers bound this
    /// with a timeout; implementations may poll indefinitely.
    async fn await_receipt(&self, handle: &SubmissionHandle) -> Result<Receipt, LedgerError>;

    /// Fetch execution details. Best-effort; failures are non-fatal.
    async fn get_record(&self, handle: &SubmissionHandle)
    -> Result<TransactionRecord, LedgerError>;
}

/// Read-only contract view interface.
#[async_trait]
pub trait ViewQueryService: Send + Sync {
    async fn call(&self, contract: &EvmAddress, data: &[u8]) -> Result<Vec<u8>, LedgerError>;
}
