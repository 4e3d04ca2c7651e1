//! Error taxonomy for the mint pipeline.

use std::time::Duration;

/// Errors that can occur while translating identities or minting.
///
/// Validation errors (key, address, amount) are raised to the caller before
/// any network interaction. Ledger-level failures (`SubmissionRejected`,
/// `Timeout`) are captured into a
/// [`MintResult`](crate::mint::MintResult) by the orchestrator instead of
/// being propagated as errors. A revert is not an error value at all: the
/// receipt status string flows into `MintStatus::Reverted` verbatim.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The private key is not a well-formed DER envelope for the expected
    /// algorithm, or has the wrong length.
    #[error("malformed key encoding: {0}")]
    MalformedKeyEncoding(String),

    /// The input is neither a `0x` EVM address nor a `shard.realm.num` id.
    #[error("unsupported address format: {0}")]
    UnsupportedAddressFormat(String),

    /// The mint amount is not a whole-unit decimal string, or does not fit
    /// in a uint256 after scaling.
    #[error("invalid amount format: {0}")]
    InvalidAmountFormat(String),

    /// The submission layer refused the transaction (fee, nonce, gas or
    /// transport problems). The underlying message is preserved verbatim.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// A suspension point exceeded the caller-supplied bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A diagnostic side-channel (balance probe, transaction record) could
    /// not be read. Never escalates to a mint failure.
    #[error("probe unavailable: {0}")]
    ProbeUnavailable(String),
}
