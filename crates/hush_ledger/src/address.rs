//! Bidirectional mapping between Hedera-native account/contract ids and
//! EVM-compatible 20-byte addresses.
//!
//! A native `shard.realm.num` id always has a deterministic EVM form (the
//! "long-zero" packing below). The reverse is deliberately unsupported: an
//! arbitrary EVM address may be an account alias with no recoverable native
//! id, so callers that need the native form must supply it explicitly.

use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Byte length of an EVM address.
pub const EVM_ADDRESS_LEN: usize = 20;

/// A Hedera entity id in `shard.realm.num` form. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeAccountId {
    shard: u64,
    realm: u64,
    num: u64,
}

impl NativeAccountId {
    /// Construct a native id, validating that the shard fits the 4-byte
    /// field of the EVM packing. Realm and num occupy full 8-byte fields,
    /// so any `u64` is representable there.
    pub fn new(shard: u64, realm: u64, num: u64) -> Result<Self, LedgerError> {
        if shard > u64::from(u32::MAX) {
            return Err(LedgerError::UnsupportedAddressFormat(format!(
                "shard {shard} does not fit the 4-byte shard field of the EVM packing"
            )));
        }
        Ok(Self { shard, realm, num })
    }

    pub fn shard(&self) -> u64 {
        self.shard
    }

    pub fn realm(&self) -> u64 {
        self.realm
    }

    pub fn num(&self) -> u64 {
        self.num
    }

    /// Pack this id into its deterministic EVM address.
    ///
    /// Layout (big-endian): bytes 0..4 shard as u32, 4..12 realm as u64,
    /// 12..20 num as u64. The packing is injective for every id accepted by
    /// [`NativeAccountId::new`], so distinct ids never collide.
    pub fn to_evm_address(&self) -> EvmAddress {
        let mut bytes = [0u8; EVM_ADDRESS_LEN];
        bytes[0..4].copy_from_slice(&(self.shard as u32).to_be_bytes());
        bytes[4..12].copy_from_slice(&self.realm.to_be_bytes());
        bytes[12..20].copy_from_slice(&self.num.to_be_bytes());
        EvmAddress(bytes)
    }
}

impl FromStr for NativeAccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(LedgerError::UnsupportedAddressFormat(format!(
                "expected shard.realm.num, got {s:?}"
            )));
        }
        let mut fields = [0u64; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                LedgerError::UnsupportedAddressFormat(format!(
                    "non-numeric segment {part:?} in {s:?}"
                ))
            })?;
        }
        Self::new(fields[0], fields[1], fields[2])
    }
}

impl fmt::Display for NativeAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// A 20-byte EVM address. The canonical textual form is `0x` followed by 40
/// lowercase hex digits; parsing accepts any case, equality is on the bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress([u8; EVM_ADDRESS_LEN]);

impl EvmAddress {
    pub fn from_bytes(bytes: [u8; EVM_ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; EVM_ADDRESS_LEN] {
        &self.0
    }

    /// Parse `0x`-prefixed hex of exactly 40 digits.
    pub fn from_hex(s: &str) -> Result<Self, LedgerError> {
        let body = s.strip_prefix("0x").ok_or_else(|| {
            LedgerError::UnsupportedAddressFormat(format!("missing 0x prefix in {s:?}"))
        })?;
        if body.len() != EVM_ADDRESS_LEN * 2 {
            return Err(LedgerError::UnsupportedAddressFormat(format!(
                "expected {} hex digits after 0x, got {}",
                EVM_ADDRESS_LEN * 2,
                body.len()
            )));
        }
        let mut bytes = [0u8; EVM_ADDRESS_LEN];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| {
            LedgerError::UnsupportedAddressFormat(format!("non-hex characters in {s:?}"))
        })?;
        Ok(Self(bytes))
    }
}

impl FromStr for EvmAddress {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress({self})")
    }
}

/// An address in either identity system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Native(NativeAccountId),
    Evm(EvmAddress),
}

impl Address {
    /// Parse either canonical form, dispatching on shape: a `0x` prefix
    /// takes the EVM path, a dotted triple the native path. Anything else
    /// fails with `UnsupportedAddressFormat`.
    pub fn parse(input: &str) -> Result<Self, LedgerError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::UnsupportedAddressFormat(
                "empty address".to_string(),
            ));
        }
        if trimmed.starts_with("0x") {
            return EvmAddress::from_hex(trimmed).map(Address::Evm);
        }
        if trimmed.contains('.') {
            return trimmed.parse().map(Address::Native);
        }
        Err(LedgerError::UnsupportedAddressFormat(format!(
            "expected 0x... or shard.realm.num, got {trimmed:?}"
        )))
    }

    /// Canonical EVM form. Total: native ids pack deterministically.
    pub fn to_evm(&self) -> EvmAddress {
        match self {
            Address::Native(id) => id.to_evm_address(),
            Address::Evm(addr) => *addr,
        }
    }

    /// The native id, when this address carries one.
    ///
    /// There is no general mapping from an EVM address back to a native id
    /// (aliased accounts have unrelated addresses), so an EVM input fails
    /// fast with guidance instead of guessing.
    pub fn native(&self) -> Result<NativeAccountId, LedgerError> {
        match self {
            Address::Native(id) => Ok(*id),
            Address::Evm(addr) => Err(LedgerError::UnsupportedAddressFormat(format!(
                "a native id cannot be derived from the EVM address {addr}; \
                 supply the shard.realm.num form (shown on HashScan)"
            ))),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Native(id) => id.fmt(f),
            Address::Evm(addr) => addr.fmt(f),
        }
    }
}

/// Compare two addresses by their canonical EVM byte forms.
pub fn addresses_equal(a: &Address, b: &Address) -> bool {
    a.to_evm() == b.to_evm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_known_account_id() {
        let id: NativeAccountId = "0.0.6428773".parse().unwrap();
        assert_eq!(
            id.to_evm_address().to_string(),
            "0x0000000000000000000000000000000000621865"
        );
    }

    #[test]
    fn packing_is_injective_for_distinct_ids() {
        let ids = [
            (0, 0, 1),
            (0, 0, 2),
            (0, 1, 1),
            (1, 0, 1),
            (0, 0, u64::MAX),
            (0, u64::MAX, 0),
            (u64::from(u32::MAX), 0, 0),
        ];
        let mut seen = std::collections::HashSet::new();
        for (shard, realm, num) in ids {
            let addr = NativeAccountId::new(shard, realm, num)
                .unwrap()
                .to_evm_address();
            assert!(seen.insert(addr), "collision for {shard}.{realm}.{num}");
        }
    }

    #[test]
    fn shard_above_ceiling_is_rejected_not_truncated() {
        let err = NativeAccountId::new(u64::from(u32::MAX) + 1, 0, 0).unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedAddressFormat(_)));
    }

    #[test]
    fn parse_dispatches_on_format() {
        assert!(matches!(
            Address::parse("0.0.1234").unwrap(),
            Address::Native(_)
        ));
        assert!(matches!(
            Address::parse("0x57B4F54d2f2F3Cc8b8A587827e4198d17C718acf").unwrap(),
            Address::Evm(_)
        ));
    }

    #[test]
    fn parse_rejects_empty_string() {
        assert!(matches!(
            Address::parse("").unwrap_err(),
            LedgerError::UnsupportedAddressFormat(_)
        ));
        assert!(Address::parse("   ").is_err());
    }

    #[test]
    fn parse_rejects_prefixed_string_of_wrong_length() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0x57B4F54d2f2F3Cc8b8A587827e4198d17C718a").is_err());
    }

    #[test]
    fn parse_rejects_non_numeric_segments() {
        assert!(Address::parse("0.0.abc").is_err());
        assert!(Address::parse("0..5").is_err());
        assert!(Address::parse("1.2").is_err());
    }

    #[test]
    fn parse_rejects_bare_words() {
        assert!(Address::parse("not-an-address").is_err());
    }

    #[test]
    fn evm_parse_is_case_insensitive_and_canonicalizes_lowercase() {
        let mixed = Address::parse("0x57B4F54d2f2F3Cc8b8A587827e4198d17C718acf").unwrap();
        let lower = Address::parse("0x57b4f54d2f2f3cc8b8a587827e4198d17c718acf").unwrap();
        assert!(addresses_equal(&mixed, &lower));
        assert_eq!(
            mixed.to_evm().to_string(),
            "0x57b4f54d2f2f3cc8b8a587827e4198d17c718acf"
        );
    }

    #[test]
    fn native_and_its_packing_compare_equal() {
        let native = Address::parse("0.0.6428773").unwrap();
        let packed = Address::parse("0x0000000000000000000000000000000000621865").unwrap();
        assert!(addresses_equal(&native, &packed));
    }

    #[test]
    fn native_id_not_derivable_from_evm_address() {
        let addr = Address::parse("0x57b4f54d2f2f3cc8b8a587827e4198d17c718acf").unwrap();
        let err = addr.native().unwrap_err();
        assert!(err.to_string().contains("shard.realm.num"));
    }

    #[test]
    fn native_display_round_trips() {
        let id: NativeAccountId = "5.2.77".parse().unwrap();
        assert_eq!(id.to_string(), "5.2.77");
        assert_eq!(id.to_string().parse::<NativeAccountId>().unwrap(), id);
    }
}
