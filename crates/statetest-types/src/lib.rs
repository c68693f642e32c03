//! Fixture types: block environment, transactions, state test declarations and
//! the fork bound fixtures built from them.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod account_info;
mod env;
mod error;
mod record;
pub mod serializer;
mod test_unit;
mod transaction;

pub use account_info::*;
pub use env::*;
pub use error::*;
pub use record::*;
pub use test_unit::*;
pub use transaction::*;
