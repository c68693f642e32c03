use crate::{serializer, ValidationError};
use core::fmt;
use k256::ecdsa::SigningKey;
use primitives::{Address, Bytes, B256, TX_BASE_GAS, TEST_PRIVATE_KEY, U256};
use serde::{Serialize, Serializer};

/// Transaction envelope type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TxType {
    /// Pre EIP-2718 transaction.
    #[default]
    Legacy = 0,
    /// EIP-2930 transaction.
    AccessList = 1,
    /// EIP-1559 transaction.
    DynamicFee = 2,
}

impl TxType {
    /// Returns the transaction type for its EIP-2718 type byte.
    pub const fn from_u8(ty: u8) -> Option<Self> {
        match ty {
            0 => Some(Self::Legacy),
            1 => Some(Self::AccessList),
            2 => Some(Self::DynamicFee),
            _ => None,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::AccessList => "access list",
            Self::DynamicFee => "dynamic fee",
        })
    }
}

impl Serialize for TxType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer::quantity_u64(&(*self as u64), serializer)
    }
}

/// EIP-2930 access list entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Accessed account.
    #[serde(serialize_with = "serializer::address")]
    pub address: Address,
    /// Accessed slots.
    #[serde(serialize_with = "serializer::words")]
    pub storage_keys: Vec<B256>,
}

/// Fee fields of a validated transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeFields {
    /// Single gas price, legacy and access list transactions.
    GasPrice(U256),
    /// EIP-1559 fee cap and tip.
    Dynamic {
        /// Fee cap.
        max_fee_per_gas: U256,
        /// Priority fee.
        max_priority_fee_per_gas: U256,
    },
}

/// Validated transaction.
///
/// Only [`TransactionBuilder::build`] creates it, so every instance satisfies the
/// type rules of its envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type")]
    ty: TxType,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_quantity_u64"
    )]
    chain_id: Option<u64>,
    #[serde(serialize_with = "serializer::quantity_u64")]
    nonce: u64,
    #[serde(serialize_with = "serializer::maybe_empty_address")]
    to: Option<Address>,
    #[serde(serialize_with = "serializer::quantity")]
    value: U256,
    #[serde(serialize_with = "serializer::quantity_u64")]
    gas_limit: u64,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_quantity"
    )]
    gas_price: Option<U256>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_quantity"
    )]
    max_fee_per_gas: Option<U256>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_quantity"
    )]
    max_priority_fee_per_gas: Option<U256>,
    #[serde(serialize_with = "serializer::bytes")]
    data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_list: Option<Vec<AccessListItem>>,
    protected: bool,
    #[serde(serialize_with = "serializer::word")]
    secret_key: B256,
    #[serde(serialize_with = "serializer::address")]
    sender: Address,
}

impl Transaction {
    /// Creates a builder with the framework defaults.
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::new()
    }

    /// Envelope type.
    pub fn ty(&self) -> TxType {
        self.ty
    }

    /// Chain id, if any.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// Sender nonce.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Call target, `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        self.to
    }

    /// Transferred value.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Gas limit.
    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Fee fields of the envelope.
    pub fn fee_fields(&self) -> FeeFields {
        match (self.gas_price, self.max_fee_per_gas, self.max_priority_fee_per_gas) {
            (_, Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) => FeeFields::Dynamic {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            },
            (gas_price, ..) => FeeFields::GasPrice(gas_price.unwrap_or_default()),
        }
    }

    /// Calldata or init code.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Access list, always present for typed transactions.
    pub fn access_list(&self) -> Option<&[AccessListItem]> {
        self.access_list.as_deref()
    }

    /// Whether a legacy transaction is EIP-155 protected.
    pub fn protected(&self) -> bool {
        self.protected
    }

    /// Signing key.
    pub fn secret_key(&self) -> B256 {
        self.secret_key
    }

    /// Address of the signing key.
    pub fn sender(&self) -> Address {
        self.sender
    }
}

/// Builder for [`Transaction`].
///
/// Numbers are accepted as [`U256`] and narrowed on [`build`](Self::build), so
/// out of range values are reported instead of truncated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionBuilder {
    ty: TxType,
    chain_id: Option<U256>,
    nonce: U256,
    to: Option<Address>,
    value: U256,
    gas_limit: U256,
    gas_price: Option<U256>,
    max_fee_per_gas: Option<U256>,
    max_priority_fee_per_gas: Option<U256>,
    data: Bytes,
    access_list: Option<Vec<AccessListItem>>,
    protected: bool,
    secret_key: B256,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self {
            ty: TxType::Legacy,
            chain_id: None,
            nonce: U256::ZERO,
            to: None,
            value: U256::ZERO,
            gas_limit: U256::from(TX_BASE_GAS),
            gas_price: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            data: Bytes::new(),
            access_list: None,
            protected: true,
            secret_key: TEST_PRIVATE_KEY,
        }
    }
}

impl TransactionBuilder {
    /// Creates a builder: legacy, nonce 0, contract creation, 21000 gas, protected,
    /// signed with the test key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the envelope type.
    pub fn ty(mut self, ty: TxType) -> Self {
        self.ty = ty;
        self
    }

    /// Sets the chain id.
    pub fn chain_id(mut self, chain_id: U256) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Sets the nonce.
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the call target.
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Makes the transaction a contract creation.
    pub fn create(mut self) -> Self {
        self.to = None;
        self
    }

    /// Sets the transferred value.
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Sets the gas limit.
    pub fn gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the legacy gas price.
    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Sets the EIP-1559 fee cap.
    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = Some(max_fee_per_gas);
        self
    }

    /// Sets the EIP-1559 priority fee.
    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Sets the calldata.
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Sets the access list.
    pub fn access_list(mut self, access_list: Vec<AccessListItem>) -> Self {
        self.access_list = Some(access_list);
        self
    }

    /// Sets EIP-155 protection of legacy transactions.
    pub fn protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }

    /// Sets the signing key.
    pub fn secret_key(mut self, secret_key: B256) -> Self {
        self.secret_key = secret_key;
        self
    }

    /// Validates the fields and builds the transaction.
    ///
    /// Checks run in this order and the first failure is returned: required fields
    /// of the type, forbidden fields of the type, EIP-155 protection, numeric widths,
    /// the signing key.
    pub fn build(self) -> Result<Transaction, ValidationError> {
        let ty = self.ty;
        let present = |field: &'static str| match field {
            "gas_price" => self.gas_price.is_some(),
            "max_fee_per_gas" => self.max_fee_per_gas.is_some(),
            "max_priority_fee_per_gas" => self.max_priority_fee_per_gas.is_some(),
            "chain_id" => self.chain_id.is_some(),
            "access_list" => self.access_list.is_some(),
            _ => false,
        };

        let (required, forbidden): (&[&'static str], &[&'static str]) = match ty {
            TxType::Legacy => (
                &["gas_price"],
                &["max_fee_per_gas", "max_priority_fee_per_gas", "access_list"],
            ),
            TxType::AccessList => (
                &["gas_price", "chain_id"],
                &["max_fee_per_gas", "max_priority_fee_per_gas"],
            ),
            TxType::DynamicFee => (
                &["max_fee_per_gas", "max_priority_fee_per_gas", "chain_id"],
                &["gas_price"],
            ),
        };
        if let Some(field) = required.iter().copied().find(|field| !present(*field)) {
            return Err(ValidationError::MissingField { ty, field });
        }
        if let Some(field) = forbidden.iter().copied().find(|field| present(*field)) {
            return Err(ValidationError::ForbiddenField { ty, field });
        }

        if ty == TxType::Legacy
            && self.protected
            && self.chain_id.is_none_or(|chain_id| chain_id.is_zero())
        {
            return Err(ValidationError::UnprotectedChainId);
        }

        let nonce = narrow("nonce", self.nonce)?;
        let gas_limit = narrow("gas_limit", self.gas_limit)?;
        let chain_id = self
            .chain_id
            .map(|chain_id| narrow("chain_id", chain_id))
            .transpose()?;

        let sender = recover_address(&self.secret_key)
            .ok_or(ValidationError::InvalidSecretKey(self.secret_key))?;

        let access_list = match ty {
            TxType::Legacy => None,
            TxType::AccessList | TxType::DynamicFee => Some(self.access_list.unwrap_or_default()),
        };

        Ok(Transaction {
            ty,
            chain_id,
            nonce,
            to: self.to,
            value: self.value,
            gas_limit,
            gas_price: self.gas_price,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            data: self.data,
            access_list,
            protected: ty == TxType::Legacy && self.protected,
            secret_key: self.secret_key,
            sender,
        })
    }
}

fn narrow(field: &'static str, value: U256) -> Result<u64, ValidationError> {
    if value.bit_len() > 64 {
        return Err(ValidationError::NumericOverflow {
            field,
            value,
            bits: 64,
        });
    }
    Ok(value.to::<u64>())
}

/// Derives the address controlled by `secret_key`.
pub fn recover_address(secret_key: &B256) -> Option<Address> {
    let key = SigningKey::from_slice(secret_key.as_slice()).ok()?;
    let public_key = key.verifying_key().to_encoded_point(false);
    Some(Address::from_raw_public_key(&public_key.as_bytes()[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{address, TEST_ADDRESS};
    use rstest::rstest;

    fn legacy() -> TransactionBuilder {
        Transaction::builder()
            .to(address!("0x1000000000000000000000000000000000000000"))
            .gas_limit(U256::from(500_000))
            .gas_price(U256::from(10))
    }

    #[test]
    fn protected_legacy_needs_chain_id() {
        assert_eq!(
            legacy().protected(true).build(),
            Err(ValidationError::UnprotectedChainId)
        );
        assert_eq!(
            legacy().protected(true).chain_id(U256::from(0)).build(),
            Err(ValidationError::UnprotectedChainId)
        );
        let tx = legacy().protected(true).chain_id(U256::from(1)).build().unwrap();
        assert_eq!(tx.chain_id(), Some(1));
        assert!(tx.protected());
    }

    #[test]
    fn unprotected_legacy_with_zero_chain_id() {
        let tx = legacy().protected(false).chain_id(U256::from(0)).build().unwrap();
        assert_eq!(tx.ty(), TxType::Legacy);
        assert_eq!(tx.fee_fields(), FeeFields::GasPrice(U256::from(10)));
        assert_eq!(tx.access_list(), None);
        assert_eq!(tx.gas_limit(), 500_000);
    }

    #[rstest]
    #[case::legacy_without_gas_price(
        Transaction::builder().protected(false),
        ValidationError::MissingField { ty: TxType::Legacy, field: "gas_price" }
    )]
    #[case::legacy_with_fee_cap(
        Transaction::builder().gas_price(U256::from(1)).max_fee_per_gas(U256::from(1)),
        ValidationError::ForbiddenField { ty: TxType::Legacy, field: "max_fee_per_gas" }
    )]
    #[case::legacy_with_access_list(
        Transaction::builder().gas_price(U256::from(1)).access_list(vec![]),
        ValidationError::ForbiddenField { ty: TxType::Legacy, field: "access_list" }
    )]
    #[case::access_list_without_chain_id(
        Transaction::builder().ty(TxType::AccessList).gas_price(U256::from(1)),
        ValidationError::MissingField { ty: TxType::AccessList, field: "chain_id" }
    )]
    #[case::access_list_with_tip(
        Transaction::builder().ty(TxType::AccessList).gas_price(U256::from(1)).chain_id(U256::from(1)).max_priority_fee_per_gas(U256::from(1)),
        ValidationError::ForbiddenField { ty: TxType::AccessList, field: "max_priority_fee_per_gas" }
    )]
    #[case::dynamic_without_tip(
        Transaction::builder().ty(TxType::DynamicFee).max_fee_per_gas(U256::from(1)).chain_id(U256::from(1)),
        ValidationError::MissingField { ty: TxType::DynamicFee, field: "max_priority_fee_per_gas" }
    )]
    #[case::dynamic_with_gas_price(
        Transaction::builder()
            .ty(TxType::DynamicFee)
            .max_fee_per_gas(U256::from(2))
            .max_priority_fee_per_gas(U256::from(1))
            .chain_id(U256::from(1))
            .gas_price(U256::from(1)),
        ValidationError::ForbiddenField { ty: TxType::DynamicFee, field: "gas_price" }
    )]
    #[case::missing_before_forbidden(
        Transaction::builder().max_fee_per_gas(U256::from(1)),
        ValidationError::MissingField { ty: TxType::Legacy, field: "gas_price" }
    )]
    #[case::forbidden_before_protection(
        Transaction::builder().gas_price(U256::from(1)).max_fee_per_gas(U256::from(1)),
        ValidationError::ForbiddenField { ty: TxType::Legacy, field: "max_fee_per_gas" }
    )]
    #[case::protection_before_width(
        Transaction::builder().gas_price(U256::from(1)).nonce(U256::MAX),
        ValidationError::UnprotectedChainId
    )]
    #[case::nonce_overflow(
        Transaction::builder().gas_price(U256::from(1)).protected(false).nonce(U256::from(u64::MAX) + U256::from(1)),
        ValidationError::NumericOverflow {
            field: "nonce",
            value: U256::from(u64::MAX) + U256::from(1),
            bits: 64,
        }
    )]
    #[case::gas_limit_overflow(
        Transaction::builder().gas_price(U256::from(1)).protected(false).gas_limit(U256::MAX),
        ValidationError::NumericOverflow { field: "gas_limit", value: U256::MAX, bits: 64 }
    )]
    #[case::zero_key(
        Transaction::builder().gas_price(U256::from(1)).protected(false).secret_key(B256::ZERO),
        ValidationError::InvalidSecretKey(B256::ZERO)
    )]
    fn rejects(#[case] builder: TransactionBuilder, #[case] expected: ValidationError) {
        assert_eq!(builder.build(), Err(expected));
    }

    #[test]
    fn typed_transactions_get_an_empty_access_list() {
        let tx = Transaction::builder()
            .ty(TxType::DynamicFee)
            .chain_id(U256::from(1))
            .max_fee_per_gas(U256::from(10))
            .max_priority_fee_per_gas(U256::from(1))
            .build()
            .unwrap();
        assert_eq!(tx.access_list(), Some(&[][..]));
        assert_eq!(
            tx.fee_fields(),
            FeeFields::Dynamic {
                max_fee_per_gas: U256::from(10),
                max_priority_fee_per_gas: U256::from(1),
            }
        );
        assert!(!tx.protected());
    }

    #[test]
    fn defaults() {
        let tx = Transaction::builder().gas_price(U256::from(1)).chain_id(U256::from(1)).build().unwrap();
        assert_eq!(tx.nonce(), 0);
        assert_eq!(tx.to(), None);
        assert_eq!(tx.value(), U256::ZERO);
        assert_eq!(tx.gas_limit(), TX_BASE_GAS);
        assert!(tx.data().is_empty());
        assert_eq!(tx.secret_key(), TEST_PRIVATE_KEY);
        assert_eq!(tx.sender(), TEST_ADDRESS);
    }

    #[test]
    fn serializes_like_a_state_test_transaction() {
        let tx = legacy().protected(false).chain_id(U256::from(0)).build().unwrap();
        assert_eq!(
            serde_json::to_string(&tx).unwrap(),
            concat!(
                r#"{"type":"0x0","chainId":"0x0","nonce":"0x0","#,
                r#""to":"0x1000000000000000000000000000000000000000","value":"0x0","#,
                r#""gasLimit":"0x7a120","gasPrice":"0xa","data":"0x","protected":false,"#,
                r#""secretKey":"0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8","#,
                r#""sender":"0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"}"#
            )
        );
    }
}
