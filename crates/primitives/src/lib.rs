//! Fork registry and primitive types shared by the statefill crates.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod constants;
pub mod fork_range;
pub mod fork_registry;
pub mod hardfork;

pub use alloy_primitives::{
    self, address, b256, bytes, hex, uint, Address, Bytes, FixedBytes, B256, U256,
};
pub use constants::*;
pub use fork_range::{ForkRange, ForkRangeResolver, ForkSelection};
pub use fork_registry::{ForkError, ForkRegistry};
pub use hardfork::SpecId;
