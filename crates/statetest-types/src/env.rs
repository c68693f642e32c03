use crate::serializer;
use primitives::{Address, SpecId, B256, DEFAULT_COINBASE, U256};
use serde::Serialize;

/// Block context a fixture's transactions execute in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Block beneficiary.
    #[serde(serialize_with = "serializer::address")]
    pub current_coinbase: Address,
    /// Block difficulty, zero from the Merge on.
    #[serde(serialize_with = "serializer::quantity")]
    pub current_difficulty: U256,
    /// Block gas limit.
    #[serde(serialize_with = "serializer::quantity_u64")]
    pub current_gas_limit: u64,
    /// Block number.
    #[serde(serialize_with = "serializer::quantity_u64")]
    pub current_number: u64,
    /// Block timestamp.
    #[serde(serialize_with = "serializer::quantity_u64")]
    pub current_timestamp: u64,
    /// EIP-1559 base fee.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_quantity"
    )]
    pub current_base_fee: Option<U256>,
    /// Hash of the parent block.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_word"
    )]
    pub previous_hash: Option<B256>,
    /// `PREVRANDAO` value after the Merge.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_word"
    )]
    pub current_random: Option<B256>,
    /// EIP-4844 excess blob gas.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serializer::opt_quantity"
    )]
    pub current_excess_blob_gas: Option<U256>,
}

impl Environment {
    /// Base fee filled in for London and later.
    pub const DEFAULT_BASE_FEE: u64 = 7;
    /// Difficulty before the Merge.
    pub const DEFAULT_DIFFICULTY: u64 = 0x20000;
    /// Block gas limit.
    pub const DEFAULT_GAS_LIMIT: u64 = 100_000_000_000_000_000;

    /// Fills header fields the fork mandates but the filler left unset.
    ///
    /// London introduces the base fee, the Merge replaces difficulty with
    /// `PREVRANDAO`, Cancun adds the excess blob gas.
    pub fn with_fork_requirements(mut self, fork: SpecId) -> Self {
        if fork.is_enabled_in(SpecId::LONDON) && self.current_base_fee.is_none() {
            self.current_base_fee = Some(U256::from(Self::DEFAULT_BASE_FEE));
        }
        if fork.is_enabled_in(SpecId::MERGE) {
            if self.current_random.is_none() {
                self.current_random = Some(B256::ZERO);
            }
            self.current_difficulty = U256::ZERO;
        }
        if fork.is_enabled_in(SpecId::CANCUN) && self.current_excess_blob_gas.is_none() {
            self.current_excess_blob_gas = Some(U256::ZERO);
        }
        self
    }

    /// Sets the coinbase.
    pub fn with_coinbase(mut self, coinbase: Address) -> Self {
        self.current_coinbase = coinbase;
        self
    }

    /// Sets the block number.
    pub fn with_number(mut self, number: u64) -> Self {
        self.current_number = number;
        self
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.current_timestamp = timestamp;
        self
    }

    /// Sets the base fee.
    pub fn with_base_fee(mut self, base_fee: U256) -> Self {
        self.current_base_fee = Some(base_fee);
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            current_coinbase: DEFAULT_COINBASE,
            current_difficulty: U256::from(Self::DEFAULT_DIFFICULTY),
            current_gas_limit: Self::DEFAULT_GAS_LIMIT,
            current_number: 1,
            current_timestamp: 1000,
            current_base_fee: None,
            previous_hash: None,
            current_random: None,
            current_excess_blob_gas: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::istanbul(SpecId::ISTANBUL, None, false, None)]
    #[case::berlin(SpecId::BERLIN, None, false, None)]
    #[case::london(SpecId::LONDON, Some(7), false, None)]
    #[case::merge(SpecId::MERGE, Some(7), true, None)]
    #[case::cancun(SpecId::CANCUN, Some(7), true, Some(0))]
    fn fork_requirements(
        #[case] fork: SpecId,
        #[case] base_fee: Option<u64>,
        #[case] post_merge: bool,
        #[case] excess_blob_gas: Option<u64>,
    ) {
        let env = Environment::default().with_fork_requirements(fork);
        assert_eq!(env.current_base_fee, base_fee.map(U256::from));
        assert_eq!(env.current_random.is_some(), post_merge);
        assert_eq!(env.current_difficulty.is_zero(), post_merge);
        assert_eq!(env.current_excess_blob_gas, excess_blob_gas.map(U256::from));
    }

    #[test]
    fn explicit_values_are_kept() {
        let env = Environment::default()
            .with_base_fee(U256::from(100))
            .with_fork_requirements(SpecId::SHANGHAI);
        assert_eq!(env.current_base_fee, Some(U256::from(100)));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&Environment::default()).unwrap();
        assert_eq!(
            json,
            r#"{"currentCoinbase":"0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba","currentDifficulty":"0x20000","currentGasLimit":"0x16345785d8a0000","currentNumber":"0x1","currentTimestamp":"0x3e8"}"#
        );
    }
}
