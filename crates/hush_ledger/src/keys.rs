//! Operator private-key codec.
//!
//! Hedera portals hand out Ed25519 keys as a PKCS#8 DER envelope, while an
//! EVM-style signer wants the raw 32-byte secret as `0x`-prefixed hex. Both
//! encodings decode to the same secret; re-encoding is lossless.

use std::fmt;

use crate::error::LedgerError;

/// Fixed PKCS#8 prefix for an Ed25519 private key: SEQUENCE header, version
/// 0, AlgorithmIdentifier for id-Ed25519 (OID 1.3.101.112), and the OCTET
/// STRING header of the 32-byte seed.
const DER_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];

/// Length of the raw Ed25519 secret.
pub const SECRET_LEN: usize = 32;

/// Total length of the DER envelope (prefix + secret).
pub const DER_TOTAL_LEN: usize = DER_PREFIX.len() + SECRET_LEN;

/// The operator's signing secret, held as raw bytes.
///
/// The raw secret is the trailing [`SECRET_LEN`] bytes of the DER envelope;
/// that slicing rule is specific to the Ed25519 PKCS#8 layout above, not a
/// generic DER operation. Callers must not persist the secret beyond the
/// process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorKey {
    secret: [u8; SECRET_LEN],
}

impl OperatorKey {
    /// Decode a DER-encoded key from hex. Rejects non-hex input, any length
    /// other than the fixed envelope length, and a foreign algorithm prefix.
    /// Never silently truncates.
    pub fn from_der_hex(der_hex: &str) -> Result<Self, LedgerError> {
        let bytes = hex::decode(der_hex.trim()).map_err(|e| {
            LedgerError::MalformedKeyEncoding(format!("key is not valid hex: {e}"))
        })?;
        if bytes.len() != DER_TOTAL_LEN {
            return Err(LedgerError::MalformedKeyEncoding(format!(
                "expected a {DER_TOTAL_LEN}-byte DER envelope ({} hex chars), got {} bytes",
                DER_TOTAL_LEN * 2,
                bytes.len()
            )));
        }
        if bytes[..DER_PREFIX.len()] != DER_PREFIX {
            return Err(LedgerError::MalformedKeyEncoding(
                "not an Ed25519 PKCS#8 envelope".to_string(),
            ));
        }
        let mut secret = [0u8; SECRET_LEN];
        secret.copy_from_slice(&bytes[DER_PREFIX.len()..]);
        Ok(Self { secret })
    }

    /// Decode a raw secret from hex (optional `0x` prefix, 64 hex chars).
    pub fn from_evm_hex(hex_secret: &str) -> Result<Self, LedgerError> {
        let body = hex_secret.trim().trim_start_matches("0x");
        let bytes = hex::decode(body).map_err(|e| {
            LedgerError::MalformedKeyEncoding(format!("key is not valid hex: {e}"))
        })?;
        let secret: [u8; SECRET_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            LedgerError::MalformedKeyEncoding(format!(
                "expected a {SECRET_LEN}-byte secret, got {} bytes",
                b.len()
            ))
        })?;
        Ok(Self { secret })
    }

    /// Decode either external encoding, dispatching on length.
    pub fn parse(input: &str) -> Result<Self, LedgerError> {
        let trimmed = input.trim();
        if trimmed.trim_start_matches("0x").len() == SECRET_LEN * 2 {
            Self::from_evm_hex(trimmed)
        } else {
            Self::from_der_hex(trimmed)
        }
    }

    pub fn from_raw_secret(secret: [u8; SECRET_LEN]) -> Self {
        Self { secret }
    }

    /// The raw 32-byte signing secret.
    pub fn raw_secret(&self) -> &[u8; SECRET_LEN] {
        &self.secret
    }

    /// The EVM-signer encoding: `0x` + 64 lowercase hex chars.
    pub fn to_evm_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret))
    }

    /// Lossless re-encode into the DER envelope hex.
    pub fn to_der_hex(&self) -> String {
        format!("{}{}", hex::encode(DER_PREFIX), hex::encode(self.secret))
    }

    /// Self-check used before the key is trusted for signing: re-encode the
    /// secret and decode it again, asserting structural equality.
    pub fn verify_round_trip(&self) -> bool {
        match Self::from_der_hex(&self.to_der_hex()) {
            Ok(decoded) => decoded.secret == self.secret,
            Err(_) => false,
        }
    }
}

// Keep the secret out of logs and error chains.
impl fmt::Debug for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OperatorKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DER: &str =
        "302e020100300506032b657004220420db484b828e64b2d8f12ce3c0a0e93a0b8cce7af1bb8f39c97732394482538e10";

    #[test]
    fn decodes_der_and_extracts_trailing_secret() {
        let key = OperatorKey::from_der_hex(SAMPLE_DER).unwrap();
        assert_eq!(
            key.to_evm_hex(),
            "0xdb484b828e64b2d8f12ce3c0a0e93a0b8cce7af1bb8f39c97732394482538e10"
        );
    }

    #[test]
    fn der_round_trip_is_lossless() {
        let key = OperatorKey::from_der_hex(SAMPLE_DER).unwrap();
        assert_eq!(key.to_der_hex(), SAMPLE_DER);
        assert!(key.verify_round_trip());
    }

    #[test]
    fn both_encodings_decode_to_identical_secrets() {
        let from_der = OperatorKey::from_der_hex(SAMPLE_DER).unwrap();
        let from_hex = OperatorKey::from_evm_hex(&from_der.to_evm_hex()).unwrap();
        assert_eq!(from_der, from_hex);
    }

    #[test]
    fn parse_dispatches_on_length() {
        let der = OperatorKey::parse(SAMPLE_DER).unwrap();
        let raw = OperatorKey::parse(&der.to_evm_hex()).unwrap();
        assert_eq!(der, raw);
    }

    #[test]
    fn rejects_wrong_total_length() {
        // 45 bytes (90 hex chars) instead of 48: must fail, never truncate.
        let short = &SAMPLE_DER[..90];
        let err = OperatorKey::from_der_hex(short).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedKeyEncoding(_)));
        assert!(err.to_string().contains("96 hex chars"));
    }

    #[test]
    fn rejects_foreign_algorithm_prefix() {
        // Same length, secp256k1-style OID bytes in place of Ed25519.
        let mut bytes = hex::decode(SAMPLE_DER).unwrap();
        bytes[9] = 0x2a;
        let err = OperatorKey::from_der_hex(&hex::encode(bytes)).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedKeyEncoding(_)));
    }

    #[test]
    fn rejects_non_hex_input() {
        assert!(OperatorKey::from_der_hex("zz484b").is_err());
        assert!(OperatorKey::from_evm_hex("0xzz").is_err());
    }

    #[test]
    fn round_trip_holds_for_arbitrary_secrets() {
        for fill in [0u8, 1, 0x7f, 0xff] {
            let key = OperatorKey::from_raw_secret([fill; SECRET_LEN]);
            assert!(key.verify_round_trip());
            assert_eq!(OperatorKey::from_der_hex(&key.to_der_hex()).unwrap(), key);
        }
    }

    #[test]
    fn debug_redacts_the_secret() {
        let key = OperatorKey::from_der_hex(SAMPLE_DER).unwrap();
        assert_eq!(format!("{key:?}"), "OperatorKey(..)");
    }
}
