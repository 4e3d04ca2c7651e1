//! Best-effort classification of ledger failure statuses.
//!
//! Maps known status codes and message fragments to short, actionable
//! guidance. The table is versioned and deliberately not exhaustive: an
//! unknown status is a first-class `Unclassified` outcome and the raw
//! message is always shown alongside.

/// Guidance table, v1. Ordered: exact network status codes first, generic
/// message fragments last, so the most specific match wins.
const GUIDANCE_V1: &[(&str, &str)] = &[
    (
        "CONTRACT_REVERT_EXECUTED",
        "the contract rejected the call; check that the operator owns the contract and the recipient is valid",
    ),
    (
        "INSUFFICIENT_ACCOUNT_BALANCE",
        "the operator account does not hold enough HBAR to cover fees",
    ),
    (
        "INSUFFICIENT_TX_FEE",
        "the fee cap is below what the network charges for this call; raise the max fee",
    ),
    (
        "INSUFFICIENT_GAS",
        "the gas limit is too low for this call; raise it",
    ),
    (
        "INVALID_CONTRACT_ID",
        "the contract id is invalid or does not exist on this network",
    ),
    (
        "insufficient funds",
        "the operator account does not hold enough HBAR to cover fees",
    ),
    (
        "nonce",
        "transaction ordering conflict; wait for pending transactions to settle and retry",
    ),
    (
        "revert",
        "the contract rejected the call; check that the operator owns the contract and the recipient is valid",
    ),
    (
        "gas",
        "gas pricing problem; raise the gas limit or the fee cap",
    ),
];

/// Outcome of matching a raw status against the guidance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A known failure with actionable guidance.
    Known(&'static str),
    /// No table entry matched; show the raw message as-is.
    Unclassified,
}

impl Classification {
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Classification::Known(text) => Some(text),
            Classification::Unclassified => None,
        }
    }
}

/// Match a raw status string or error message against the guidance table.
pub fn classify(raw: &str) -> Classification {
    let lowered = raw.to_lowercase();
    for (pattern, guidance) in GUIDANCE_V1 {
        if lowered.contains(&pattern.to_lowercase()) {
            return Classification::Known(guidance);
        }
    }
    Classification::Unclassified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_contract_revert() {
        let c = classify("CONTRACT_REVERT_EXECUTED");
        assert!(c.guidance().unwrap().contains("owns the contract"));
    }

    #[test]
    fn classifies_relay_error_messages() {
        let c = classify("insufficient funds for gas * price + value");
        assert!(c.guidance().unwrap().contains("HBAR"));

        let c = classify("nonce too low");
        assert!(c.guidance().unwrap().contains("ordering"));
    }

    #[test]
    fn specific_codes_win_over_generic_fragments() {
        // Contains both "INSUFFICIENT_GAS" and the generic "gas" fragment.
        let c = classify("precheck failed: INSUFFICIENT_GAS");
        assert_eq!(c.guidance(), Some("the gas limit is too low for this call; raise it"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_ne!(classify("contract_revert_executed"), Classification::Unclassified);
    }

    #[test]
    fn unknown_status_is_unclassified() {
        assert_eq!(classify("PLATFORM_NOT_ACTIVE"), Classification::Unclassified);
        assert_eq!(classify("").guidance(), None);
    }
}
