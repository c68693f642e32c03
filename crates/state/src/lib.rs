//! Account and storage state of fixtures, and comparison of expected against actual state.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod account;
mod discrepancy;
mod storage;

pub use account::{Account, ExpectedAccount};
pub use discrepancy::Discrepancy;
pub use primitives;
pub use storage::Storage;

use primitives::Address;
use std::collections::BTreeMap;

/// Accounts of a state snapshot, ordered by address.
pub type State = BTreeMap<Address, Account>;

/// Expected accounts of a post state, ordered by address.
pub type ExpectedState = BTreeMap<Address, ExpectedAccount>;
