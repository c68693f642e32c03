//! `serialize_with` helpers for the hex conventions of state test fixtures.
//!
//! Quantities are `0x` prefixed minimal hex (`0x0` for zero), addresses and byte
//! strings are `0x` prefixed lowercase hex.

use primitives::{hex, Address, Bytes, B256, U256};
use serde::{ser::SerializeMap, Serializer};
use state::Storage;

/// Minimal hex quantity.
pub fn quantity<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:#x}"))
}

/// Minimal hex quantity for machine sized integers.
pub fn quantity_u64<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:#x}"))
}

/// Optional minimal hex quantity. Pair with `skip_serializing_if = "Option::is_none"`.
pub fn opt_quantity<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => quantity(value, serializer),
        None => serializer.serialize_none(),
    }
}

/// Optional minimal hex quantity for machine sized integers.
pub fn opt_quantity_u64<S: Serializer>(
    value: &Option<u64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => quantity_u64(value, serializer),
        None => serializer.serialize_none(),
    }
}

/// Lowercase 40 digit address.
pub fn address<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode_prefixed(value))
}

/// Call target, the empty string meaning contract creation.
pub fn maybe_empty_address<S: Serializer>(
    value: &Option<Address>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => address(value, serializer),
        None => serializer.serialize_str(""),
    }
}

/// Byte string.
pub fn bytes<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode_prefixed(value))
}

/// 32 byte word.
pub fn word<S: Serializer>(value: &B256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode_prefixed(value))
}

/// Optional 32 byte word.
pub fn opt_word<S: Serializer>(value: &Option<B256>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => word(value, serializer),
        None => serializer.serialize_none(),
    }
}

/// List of 32 byte words.
pub fn words<S: Serializer>(value: &[B256], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(value.iter().map(hex::encode_prefixed))
}

/// Storage as a key ordered map of quantities. Zero slots are left out.
pub fn storage<S: Serializer>(value: &Storage, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    for (key, value) in value.non_zero() {
        map.serialize_entry(&format!("{key:#x}"), &format!("{value:#x}"))?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{address, bytes};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Probe {
        #[serde(serialize_with = "quantity")]
        zero: U256,
        #[serde(serialize_with = "quantity")]
        big: U256,
        #[serde(serialize_with = "address")]
        address: Address,
        #[serde(serialize_with = "maybe_empty_address")]
        to: Option<Address>,
        #[serde(serialize_with = "bytes")]
        code: Bytes,
        #[serde(serialize_with = "storage")]
        storage: Storage,
    }

    #[test]
    fn hex_conventions() {
        let probe = Probe {
            zero: U256::ZERO,
            big: U256::from(0x0BA1A9CE0BA1A9CEu64),
            address: address!("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"),
            to: None,
            code: bytes!("600100"),
            storage: Storage::from([(2u64, 0u64), (16, 1), (1, 0xff)]),
        };
        assert_eq!(
            serde_json::to_string(&probe).unwrap(),
            r#"{"zero":"0x0","big":"0xba1a9ce0ba1a9ce","address":"0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b","to":"","code":"0x600100","storage":{"0x1":"0xff","0x10":"0x1"}}"#
        );
    }
}
