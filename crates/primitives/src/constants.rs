//! Well-known values shared by fillers and fixtures.

use crate::{address, b256, Address, B256};

/// Private key of the default transaction sender.
pub const TEST_PRIVATE_KEY: B256 =
    b256!("0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8");

/// Address derived from [`TEST_PRIVATE_KEY`].
pub const TEST_ADDRESS: Address = address!("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b");

/// Default block beneficiary of fixture environments.
pub const DEFAULT_COINBASE: Address = address!("0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba");

/// Intrinsic gas of a plain value transfer, used as the default transaction gas limit.
pub const TX_BASE_GAS: u64 = 21_000;
