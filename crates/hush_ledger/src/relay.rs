//! Production collaborator: the Hedera JSON-RPC relay (Hashio).
//!
//! The relay exposes the ledger's EVM surface, so submission rides on an
//! ordinary `ethers` provider plus a local wallet built from the operator's
//! raw secret. HBAR appears as the 18-decimal native currency.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address as RelayAddress, Bytes, H256, TransactionRequest, U256};
use tracing::{debug, info};

use crate::address::EvmAddress;
use crate::error::LedgerError;
use crate::keys::OperatorKey;
use crate::network::{Network, validate_endpoint};
use crate::service::{
    ContractCall, Receipt, SUCCESS_STATUS, SubmissionHandle, TransactionRecord,
    TransactionService, ViewQueryService,
};

/// Receipt status string reported for an execution-layer failure.
const REVERT_STATUS: &str = "CONTRACT_REVERT_EXECUTED";

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Wei per HBAR on the relay's 18-decimal native-currency view.
const WEI_PER_HBAR: u64 = 1_000_000_000_000_000_000;

/// Signing JSON-RPC relay client. Implements both collaborator traits.
///
/// One client holds one signing identity; the relay middleware sequences
/// nonces per instance.
pub struct RelayClient {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
    network: Network,
}

impl RelayClient {
    /// Connect to the network's default public relay.
    pub fn new(network: Network, key: &OperatorKey) -> Result<Self> {
        Self::with_endpoint(network, key, network.relay_url())
    }

    /// Connect to a custom relay endpoint (self-hosted relay, test server).
    pub fn with_endpoint(network: Network, key: &OperatorKey, endpoint: &str) -> Result<Self> {
        if !validate_endpoint(endpoint) {
            anyhow::bail!("invalid relay endpoint: {endpoint}");
        }
        let provider = Provider::<Http>::try_from(endpoint)
            .with_context(|| format!("failed to build provider for {endpoint}"))?;
        let wallet = LocalWallet::from_bytes(key.raw_secret())
            .context("operator secret is not a usable signing key")?
            .with_chain_id(network.chain_id());
        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
            network,
        })
    }

    /// The EVM address the signer derives from the operator secret.
    ///
    /// For auto-created Hedera accounts this can differ from the account's
    /// registered alias; `inspect-key` surfaces the comparison.
    pub fn signer_address(&self) -> EvmAddress {
        EvmAddress::from_bytes(self.client.signer().address().0)
    }

    fn relay_address(address: &EvmAddress) -> RelayAddress {
        RelayAddress::from_slice(address.as_bytes())
    }
}

#[async_trait]
impl TransactionService for RelayClient {
    async fn submit(&self, call: &ContractCall) -> Result<SubmissionHandle, LedgerError> {
        let gas_price = self
            .client
            .get_gas_price()
            .await
            .map_err(|e| LedgerError::SubmissionRejected(e.to_string()))?;

        // Enforce the HBAR fee cap before anything leaves the process.
        let fee_cap_wei = U256::from(call.max_fee_hbar) * U256::from(WEI_PER_HBAR);
        let worst_case = gas_price
            .checked_mul(U256::from(call.gas_limit))
            .unwrap_or(U256::MAX);
        if worst_case > fee_cap_wei {
            return Err(LedgerError::SubmissionRejected(format!(
                "worst-case fee {worst_case} wei exceeds the {} HBAR cap at gas price {gas_price}",
                call.max_fee_hbar
            )));
        }

        let tx = TransactionRequest::new()
            .to(Self::relay_address(&call.contract))
            .data(Bytes::from(call.data.clone()))
            .gas(call.gas_limit)
            .gas_price(gas_price)
            .chain_id(self.network.chain_id());

        debug!(
            function = call.function,
            gas = call.gas_limit,
            gas_price = %gas_price,
            "submitting transaction"
        );
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| LedgerError::SubmissionRejected(e.to_string()))?;
        let tx_hash: H256 = *pending;
        let tx_ref = format!("{tx_hash:?}");
        info!(tx = %tx_ref, function = call.function, "transaction submitted");
        Ok(SubmissionHandle { tx_ref })
    }

    async fn await_receipt(&self, handle: &SubmissionHandle) -> Result<Receipt, LedgerError> {
        let hash: H256 = handle.tx_ref.parse().map_err(|_| {
            LedgerError::SubmissionRejected(format!("malformed transaction ref {}", handle.tx_ref))
        })?;
        loop {
            match self.client.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    let status = match receipt.status.map(|s| s.as_u64()) {
                        Some(1) => SUCCESS_STATUS.to_string(),
                        _ => REVERT_STATUS.to_string(),
                    };
                    return Ok(Receipt {
                        status,
                        tx_ref: handle.tx_ref.clone(),
                    });
                }
                // Not yet ordered; the caller bounds the overall wait.
                Ok(None) => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
                Err(e) => return Err(LedgerError::SubmissionRejected(e.to_string())),
            }
        }
    }

    async fn get_record(
        &self,
        handle: &SubmissionHandle,
    ) -> Result<TransactionRecord, LedgerError> {
        let hash: H256 = handle
            .tx_ref
            .parse()
            .map_err(|_| LedgerError::ProbeUnavailable("malformed transaction ref".to_string()))?;
        let receipt = self
            .client
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| LedgerError::ProbeUnavailable(e.to_string()))?
            .ok_or_else(|| LedgerError::ProbeUnavailable("record not yet available".to_string()))?;
        Ok(TransactionRecord {
            gas_used: receipt.gas_used.map(|g| g.as_u64()),
            log_count: receipt.logs.len(),
        })
    }
}

#[async_trait]
impl ViewQueryService for RelayClient {
    async fn call(&self, contract: &EvmAddress, data: &[u8]) -> Result<Vec<u8>, LedgerError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(Self::relay_address(contract))
            .data(Bytes::from(data.to_vec()))
            .into();
        let out = self
            .client
            .call(&tx, None)
            .await
            .map_err(|e| LedgerError::ProbeUnavailable(e.to_string()))?;
        Ok(out.to_vec())
    }
}
