//! Operator configuration.
//!
//! An explicit value object assembled at the binary boundary and passed into
//! the pipeline; core logic never reads process environment or global state.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use hush_ledger::{Address, EvmAddress, MintOptions, NativeAccountId, Network, OperatorKey};

/// Env-file key the deployed manager contract address is stored under.
pub const KEY_CONTRACT_ADDRESS: &str = "HUSH_CONTRACT_ADDRESS";
/// Env-file key the linked token address is stored under.
pub const KEY_TOKEN_ADDRESS: &str = "HUSH_TOKEN_ADDRESS";

/// Everything one invocation needs: identity, endpoints and mint tunables.
#[derive(Clone)]
pub struct OperatorConfig {
    /// Operator account in `shard.realm.num` form.
    pub operator_id: Option<String>,
    /// DER-encoded operator private key, hex. Never logged or persisted.
    pub operator_key_der: Option<String>,
    pub network: Network,
    /// Token contract, either `0x...` or `shard.realm.num`.
    pub contract: Option<String>,
    pub token_decimals: u32,
    pub gas_limit: u64,
    pub max_fee_hbar: u64,
    pub receipt_timeout_secs: u64,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            operator_id: None,
            operator_key_der: None,
            network: Network::Testnet,
            contract: None,
            token_decimals: 18,
            gas_limit: 300_000,
            max_fee_hbar: 10,
            receipt_timeout_secs: 120,
        }
    }
}

impl OperatorConfig {
    /// Decode and self-check the operator key.
    pub fn operator_key(&self) -> Result<OperatorKey> {
        let der = self
            .operator_key_der
            .as_deref()
            .context("operator key not set (HUSH_OPERATOR_KEY_DER or --operator-key-der)")?;
        let key = OperatorKey::parse(der).context("could not decode the operator key")?;
        anyhow::ensure!(
            key.verify_round_trip(),
            "operator key failed its round-trip self-check"
        );
        Ok(key)
    }

    /// The operator's native account id.
    pub fn operator_account(&self) -> Result<NativeAccountId> {
        let raw = self
            .operator_id
            .as_deref()
            .context("operator account not set (HUSH_OPERATOR_ID or --operator-id)")?;
        Address::parse(raw)
            .and_then(|addr| addr.native())
            .with_context(|| format!("operator id {raw:?} is not a shard.realm.num id"))
    }

    /// Canonical EVM address of the token contract.
    pub fn contract_address(&self) -> Result<EvmAddress> {
        let raw = self
            .contract
            .as_deref()
            .context("contract address not set (HUSH_CONTRACT_ADDRESS or --contract)")?;
        Ok(Address::parse(raw)
            .with_context(|| format!("contract address {raw:?} is not parseable"))?
            .to_evm())
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn mint_options(&self) -> MintOptions {
        MintOptions {
            token_decimals: self.token_decimals,
            gas_limit: self.gas_limit,
            max_fee_hbar: self.max_fee_hbar,
            receipt_timeout: self.receipt_timeout(),
        }
    }
}

// The key stays out of debug output.
impl fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("operator_id", &self.operator_id)
            .field(
                "operator_key_der",
                &self.operator_key_der.as_ref().map(|_| ".."),
            )
            .field("network", &self.network)
            .field("contract", &self.contract)
            .field("token_decimals", &self.token_decimals)
            .field("gas_limit", &self.gas_limit)
            .field("max_fee_hbar", &self.max_fee_hbar)
            .field("receipt_timeout_secs", &self.receipt_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DER: &str =
        "302e020100300506032b657004220420db484b828e64b2d8f12ce3c0a0e93a0b8cce7af1bb8f39c97732394482538e10";

    #[test]
    fn defaults_match_the_token_profile() {
        let config = OperatorConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.token_decimals, 18);
        assert_eq!(config.gas_limit, 300_000);
        assert_eq!(config.max_fee_hbar, 10);
    }

    #[test]
    fn missing_fields_yield_actionable_errors() {
        let config = OperatorConfig::default();
        assert!(config.operator_key().unwrap_err().to_string().contains("HUSH_OPERATOR_KEY_DER"));
        assert!(config.operator_account().unwrap_err().to_string().contains("HUSH_OPERATOR_ID"));
        assert!(config.contract_address().unwrap_err().to_string().contains("HUSH_CONTRACT_ADDRESS"));
    }

    #[test]
    fn decodes_and_checks_the_operator_key() {
        let config = OperatorConfig {
            operator_key_der: Some(SAMPLE_DER.to_string()),
            ..OperatorConfig::default()
        };
        let key = config.operator_key().unwrap();
        assert!(key.verify_round_trip());
    }

    #[test]
    fn operator_id_must_be_native_form() {
        let config = OperatorConfig {
            operator_id: Some("0x57b4f54d2f2f3cc8b8a587827e4198d17c718acf".to_string()),
            ..OperatorConfig::default()
        };
        assert!(config.operator_account().is_err());

        let config = OperatorConfig {
            operator_id: Some("0.0.6428773".to_string()),
            ..OperatorConfig::default()
        };
        assert_eq!(config.operator_account().unwrap().num(), 6428773);
    }

    #[test]
    fn contract_accepts_either_form() {
        for contract in ["0.0.5555", "0x00000000000000000000000000000000000015b3"] {
            let config = OperatorConfig {
                contract: Some(contract.to_string()),
                ..OperatorConfig::default()
            };
            assert_eq!(
                config.contract_address().unwrap().to_string(),
                "0x00000000000000000000000000000000000015b3"
            );
        }
    }

    #[test]
    fn debug_redacts_the_key() {
        let config = OperatorConfig {
            operator_key_der: Some(SAMPLE_DER.to_string()),
            ..OperatorConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("302e0201"));
    }
}
