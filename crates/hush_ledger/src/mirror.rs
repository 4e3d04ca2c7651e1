//! Mirror-node REST client.
//!
//! Auto-created Hedera accounts carry an EVM alias that is unrelated to the
//! deterministic long-zero packing of their native id. The mirror node is
//! the authority on which address the ledger actually registered, so the
//! key-inspection flow shows both side by side.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::address::{EvmAddress, NativeAccountId};
use crate::network::{Network, validate_endpoint};

/// Client for the Hedera mirror-node REST API.
pub struct MirrorClient {
    http: Client,
    base_url: String,
}

/// Subset of the `/api/v1/accounts/{id}` payload we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorAccount {
    pub account: String,
    pub evm_address: Option<String>,
    pub balance: Option<MirrorBalance>,
}

/// Account balance in tinybars.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorBalance {
    pub balance: Option<i64>,
}

impl MirrorClient {
    /// Create a client for the network's public mirror node.
    pub fn new(network: Network) -> Result<Self> {
        Self::with_base_url(network.mirror_url())
    }

    /// Create a client pointing at a custom mirror endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !validate_endpoint(&base_url) {
            anyhow::bail!("invalid mirror endpoint: {base_url}");
        }
        let http = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    /// Fetch the mirror node's view of an account.
    pub async fn get_account(&self, id: &NativeAccountId) -> Result<MirrorAccount> {
        let url = format!("{}/api/v1/accounts/{id}", self.base_url);
        debug!(url = %url, "querying mirror node");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("mirror node request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("mirror node returned {} for account {id}", response.status());
        }
        response
            .json()
            .await
            .context("malformed mirror node response")
    }

    /// The EVM address the ledger registered for an account, if any.
    pub async fn registered_evm_address(
        &self,
        id: &NativeAccountId,
    ) -> Result<Option<EvmAddress>> {
        let account = self.get_account(id).await?;
        match account.evm_address.as_deref() {
            Some(raw) => {
                let address = EvmAddress::from_hex(raw)
                    .with_context(|| format!("mirror node returned a malformed address {raw:?}"))?;
                Ok(Some(address))
            }
            None => Ok(None),
        }
    }
}
