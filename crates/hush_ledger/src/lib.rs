// Address/key translation and minting pipeline for the HUSH reward token.

pub mod abi;
pub mod address;
pub mod amount;
pub mod error;
pub mod keys;
pub mod mint;
pub mod mirror;
pub mod network;
pub mod probe;
pub mod relay;
pub mod service;
pub mod status;

// Re-export primary types for convenient access.
pub use address::{Address, EvmAddress, NativeAccountId, addresses_equal};
pub use amount::TokenAmount;
pub use error::LedgerError;
pub use keys::OperatorKey;
pub use mint::{MintOptions, MintOrchestrator, MintRequest, MintResult, MintStatus};
pub use mirror::MirrorClient;
pub use network::Network;
pub use probe::{BalanceProbe, BalanceReading};
pub use relay::RelayClient;
pub use service::{
    ContractCall, Receipt, SubmissionHandle, TransactionRecord, TransactionService,
    ViewQueryService,
};
pub use status::{Classification, classify};
