use crate::{Discrepancy, Storage};
use primitives::{Bytes, U256};

/// Account as it exists in a pre or post state snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Account balance in wei.
    pub balance: U256,
    /// Account nonce.
    pub nonce: u64,
    /// Deployed code, empty for externally owned accounts.
    pub code: Bytes,
    /// Storage, zero slots are equivalent to unset ones.
    pub storage: Storage,
}

impl Account {
    /// Creates an account with only a balance.
    pub fn from_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Sets the balance.
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Sets the nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the code.
    pub fn with_code(mut self, code: impl Into<Bytes>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the storage.
    pub fn with_storage(mut self, storage: impl Into<Storage>) -> Self {
        self.storage = storage.into();
        self
    }

    /// Returns `true` if the account has no code, nonce, balance nor storage.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.code.is_empty() && self.storage.is_empty()
    }

    /// Differences of `actual` from `self`, taken as the expectation.
    ///
    /// Balance, nonce and code are compared exactly. Storage is compared over the
    /// keys present in either account, an absent key reading as zero. The result is
    /// ordered: balance, nonce, code, then storage slots by key.
    pub fn diff(&self, actual: &Account) -> Vec<Discrepancy> {
        ExpectedAccount::from(self.clone()).diff(actual)
    }
}

/// Expected post state of an account.
///
/// Fields left as `None` are not checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpectedAccount {
    /// Expected balance.
    pub balance: Option<U256>,
    /// Expected nonce.
    pub nonce: Option<u64>,
    /// Expected code.
    pub code: Option<Bytes>,
    /// Expected storage. Slots missing here must read as zero.
    pub storage: Option<Storage>,
}

impl ExpectedAccount {
    /// Expectation that checks nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the given balance.
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Expects the given nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Expects the given code.
    pub fn with_code(mut self, code: impl Into<Bytes>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Expects the given storage.
    pub fn with_storage(mut self, storage: impl Into<Storage>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    /// Differences of `actual` from this expectation.
    pub fn diff(&self, actual: &Account) -> Vec<Discrepancy> {
        let mut discrepancies = Vec::new();
        if let Some(expected) = self.balance.filter(|b| *b != actual.balance) {
            discrepancies.push(Discrepancy::BalanceMismatch {
                expected,
                actual: actual.balance,
            });
        }
        if let Some(expected) = self.nonce.filter(|n| *n != actual.nonce) {
            discrepancies.push(Discrepancy::NonceMismatch {
                expected,
                actual: actual.nonce,
            });
        }
        if let Some(expected) = self.code.as_ref().filter(|c| **c != actual.code) {
            discrepancies.push(Discrepancy::CodeMismatch {
                expected: expected.clone(),
                actual: actual.code.clone(),
            });
        }
        if let Some(storage) = &self.storage {
            discrepancies.extend(storage.differing_slots(&actual.storage).into_iter().map(
                |(key, expected, actual)| Discrepancy::StorageMismatch {
                    key,
                    expected,
                    actual,
                },
            ));
        }
        discrepancies
    }
}

impl From<Account> for ExpectedAccount {
    fn from(account: Account) -> Self {
        Self {
            balance: Some(account.balance),
            nonce: Some(account.nonce),
            code: Some(account.code),
            storage: Some(account.storage),
        }
    }
}
