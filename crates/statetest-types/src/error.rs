use crate::TxType;
use primitives::{B256, U256};
use thiserror::Error;

/// Transaction field inconsistencies, reported in validation order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field the transaction type needs is absent.
    #[error("{ty} transaction requires `{field}`")]
    MissingField {
        /// Transaction type.
        ty: TxType,
        /// Missing field.
        field: &'static str,
    },
    /// A field the transaction type does not have is present.
    #[error("{ty} transaction does not accept `{field}`")]
    ForbiddenField {
        /// Transaction type.
        ty: TxType,
        /// Offending field.
        field: &'static str,
    },
    /// EIP-155 replay protection was requested without a chain id.
    #[error("protected legacy transaction requires a non-zero chain id")]
    UnprotectedChainId,
    /// A field does not fit its declared width.
    #[error("`{field}` value {value:#x} does not fit in {bits} bits")]
    NumericOverflow {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: U256,
        /// Width of the field.
        bits: u32,
    },
    /// The secret key is not a valid secp256k1 scalar.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(B256),
}
