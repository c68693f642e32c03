use core::fmt;
use primitives::{Bytes, U256};

/// One difference between an expected and an actual account.
///
/// Discrepancies are results, not errors: a non-empty list means the fixture
/// failed, and it is up to the runner to report it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Discrepancy {
    /// Balances differ.
    BalanceMismatch {
        /// Expected balance.
        expected: U256,
        /// Actual balance.
        actual: U256,
    },
    /// Nonces differ.
    NonceMismatch {
        /// Expected nonce.
        expected: u64,
        /// Actual nonce.
        actual: u64,
    },
    /// Code differs.
    CodeMismatch {
        /// Expected code.
        expected: Bytes,
        /// Actual code.
        actual: Bytes,
    },
    /// A storage slot differs, absent slots reading as zero.
    StorageMismatch {
        /// Slot key.
        key: U256,
        /// Expected value.
        expected: U256,
        /// Actual value.
        actual: U256,
    },
}

impl Discrepancy {
    /// Slot key of a storage mismatch.
    pub fn storage_key(&self) -> Option<U256> {
        match self {
            Self::StorageMismatch { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Same discrepancy with expected and actual exchanged.
    pub fn swapped(&self) -> Self {
        match self.clone() {
            Self::BalanceMismatch { expected, actual } => Self::BalanceMismatch {
                expected: actual,
                actual: expected,
            },
            Self::NonceMismatch { expected, actual } => Self::NonceMismatch {
                expected: actual,
                actual: expected,
            },
            Self::CodeMismatch { expected, actual } => Self::CodeMismatch {
                expected: actual,
                actual: expected,
            },
            Self::StorageMismatch {
                key,
                expected,
                actual,
            } => Self::StorageMismatch {
                key,
                expected: actual,
                actual: expected,
            },
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BalanceMismatch { expected, actual } => {
                write!(f, "balance mismatch: expected {expected:#x}, got {actual:#x}")
            }
            Self::NonceMismatch { expected, actual } => {
                write!(f, "nonce mismatch: expected {expected}, got {actual}")
            }
            Self::CodeMismatch { expected, actual } => {
                write!(f, "code mismatch: expected {expected}, got {actual}")
            }
            Self::StorageMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "storage mismatch at {key:#x}: expected {expected:#x}, got {actual:#x}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let d = Discrepancy::StorageMismatch {
            key: U256::from(1),
            expected: U256::from(0xff),
            actual: U256::ZERO,
        };
        assert_eq!(d.to_string(), "storage mismatch at 0x1: expected 0xff, got 0x0");
        assert_eq!(d.swapped().swapped(), d);
    }
}
