//! Fixed-point token amounts.
//!
//! A human-entered whole-unit decimal string becomes a smallest-unit integer
//! by exact multiplication with `10^exponent`. Arithmetic is 256-bit and
//! checked; no floating point anywhere.

use std::fmt;

use ethers::types::U256;

use crate::error::LedgerError;

/// A non-negative token amount in the token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn from_smallest_units(units: U256) -> Self {
        Self(units)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Scale a whole-unit decimal string by `10^exponent`.
    ///
    /// Only `^[0-9]+$` inputs are accepted. The result must fit a uint256
    /// (the on-chain amount type); anything larger is a validation error,
    /// not a wrapped or truncated value.
    pub fn scale(decimal: &str, exponent: u32) -> Result<Self, LedgerError> {
        let trimmed = decimal.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidAmountFormat(format!(
                "expected a whole-unit decimal string, got {decimal:?}"
            )));
        }
        let units = U256::from_dec_str(trimmed).map_err(|_| {
            LedgerError::InvalidAmountFormat(format!("{trimmed:?} exceeds uint256"))
        })?;
        let factor = U256::from(10u8)
            .checked_pow(U256::from(exponent))
            .ok_or_else(|| {
                LedgerError::InvalidAmountFormat(format!("10^{exponent} exceeds uint256"))
            })?;
        let scaled = units.checked_mul(factor).ok_or_else(|| {
            LedgerError::InvalidAmountFormat(format!(
                "{trimmed} * 10^{exponent} exceeds uint256"
            ))
        })?;
        Ok(Self(scaled))
    }

    /// Inverse of [`scale`](Self::scale) for display. Truncating: fractional
    /// remainders below one whole unit are dropped, never rounded.
    pub fn unscale(&self, exponent: u32) -> String {
        match U256::from(10u8).checked_pow(U256::from(exponent)) {
            Some(factor) => (self.0 / factor).to_string(),
            // 10^exponent above uint256 divides any representable amount to zero.
            None => "0".to_string(),
        }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
