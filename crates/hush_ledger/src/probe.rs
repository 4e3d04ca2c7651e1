//! Read-only token balance probe.

use std::fmt;

use tracing::warn;

use crate::abi;
use crate::address::EvmAddress;
use crate::amount::TokenAmount;
use crate::service::ViewQueryService;

/// A probed balance. `Unknown` is the sentinel for a failed or malformed
/// query; probing is diagnostic and must never block a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceReading {
    Known(TokenAmount),
    Unknown,
}

impl fmt::Display for BalanceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceReading::Known(amount) => amount.fmt(f),
            BalanceReading::Unknown => f.write_str("unknown"),
        }
    }
}

/// Queries a holder's balance through the contract's `balanceOf` view.
pub struct BalanceProbe<'a, Q: ViewQueryService + ?Sized> {
    view: &'a Q,
    contract: EvmAddress,
}

impl<'a, Q: ViewQueryService + ?Sized> BalanceProbe<'a, Q> {
    pub fn new(view: &'a Q, contract: EvmAddress) -> Self {
        Self { view, contract }
    }

    /// Query a holder's balance. Any underlying failure (transport, revert,
    /// short return) is reported through the log side-channel and collapses
    /// to `Unknown` rather than an error.
    pub async fn query(&self, holder: &EvmAddress) -> BalanceReading {
        let data = abi::balance_of(holder);
        match self.view.call(&self.contract, &data).await {
            Ok(ret) => match abi::decode_uint256(&ret) {
                Some(raw) => BalanceReading::Known(TokenAmount::from_smallest_units(raw)),
                None => {
                    warn!(
                        holder = %holder,
                        bytes = ret.len(),
                        "balance query returned a short word, continuing without it"
                    );
                    BalanceReading::Unknown
                }
            },
            Err(e) => {
                warn!(holder = %holder, error = %e, "balance query failed, continuing without it");
                BalanceReading::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use ethers::types::U256;

    use super::*;
    use crate::error::LedgerError;

    struct FixedView {
        response: Result<Vec<u8>, ()>,
    }

    #[async_trait]
    impl ViewQueryService for FixedView {
        async fn call(&self, _contract: &EvmAddress, _data: &[u8]) -> Result<Vec<u8>, LedgerError> {
            match &self.response {
                Ok(bytes) => Ok(bytes.clone()),
                Err(()) => Err(LedgerError::ProbeUnavailable("connection refused".into())),
            }
        }
    }

    fn contract() -> EvmAddress {
        EvmAddress::from_bytes([0x11; 20])
    }

    #[tokio::test]
    async fn decodes_a_known_balance() {
        let mut word = vec![0u8; 32];
        word[31] = 7;
        let view = FixedView { response: Ok(word) };
        let probe = BalanceProbe::new(&view, contract());
        let reading = probe.query(&EvmAddress::from_bytes([0x22; 20])).await;
        assert_eq!(
            reading,
            BalanceReading::Known(TokenAmount::from_smallest_units(U256::from(7u8)))
        );
    }

    #[tokio::test]
    async fn query_failure_collapses_to_unknown() {
        let view = FixedView { response: Err(()) };
        let probe = BalanceProbe::new(&view, contract());
        let reading = probe.query(&EvmAddress::from_bytes([0x22; 20])).await;
        assert_eq!(reading, BalanceReading::Unknown);
    }

    #[tokio::test]
    async fn short_return_collapses_to_unknown() {
        let view = FixedView {
            response: Ok(vec![1, 2, 3]),
        };
        let probe = BalanceProbe::new(&view, contract());
        let reading = probe.query(&EvmAddress::from_bytes([0x22; 20])).await;
        assert_eq!(reading, BalanceReading::Unknown);
    }
}
