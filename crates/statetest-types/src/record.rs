use crate::{AccountInfo, Environment, ExpectedAccountInfo, StateTestCase, Transaction};
use primitives::hex;
use serde::{ser::SerializeMap, Serialize, Serializer};
use state::{ExpectedState, State};

/// Fixture as handed to a conformance runner.
///
/// Maps are emitted in address order and every number in hex, so equal fixtures
/// always serialize to the same bytes.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FixtureRecord<'a> {
    /// Fixture name.
    pub name: &'a str,
    /// Fork name.
    pub fork: &'static str,
    /// Block context.
    pub env: &'a Environment,
    /// Accounts before execution.
    #[serde(serialize_with = "pre_state")]
    pub pre: &'a State,
    /// Transactions in execution order.
    pub transactions: &'a [Transaction],
    /// Expected accounts after execution.
    #[serde(serialize_with = "post_state")]
    pub post: &'a ExpectedState,
}

impl<'a> FixtureRecord<'a> {
    /// Borrows the parts of `case`.
    pub fn new(case: &'a StateTestCase) -> Self {
        Self {
            name: case.name(),
            fork: case.fork().name(),
            env: case.env(),
            pre: case.pre(),
            transactions: case.txs(),
            post: case.post(),
        }
    }
}

fn pre_state<S: Serializer>(state: &&State, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(state.len()))?;
    for (address, account) in state.iter() {
        map.serialize_entry(&hex::encode_prefixed(address), &AccountInfo(account))?;
    }
    map.end()
}

fn post_state<S: Serializer>(state: &&ExpectedState, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(state.len()))?;
    for (address, account) in state.iter() {
        map.serialize_entry(&hex::encode_prefixed(address), &ExpectedAccountInfo(account))?;
    }
    map.end()
}

/// Fixtures of one filler, keyed `"{name}[fork_{fork}]"` in generation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestSuite(pub Vec<StateTestCase>);

impl TestSuite {
    /// Key of `case` in the serialized suite.
    pub fn key(case: &StateTestCase) -> String {
        format!("{}[fork_{}]", case.name(), case.fork())
    }

    /// Pretty printed JSON of the suite.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for TestSuite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for case in &self.0 {
            map.serialize_entry(&Self::key(case), &case.to_record())?;
        }
        map.end()
    }
}
