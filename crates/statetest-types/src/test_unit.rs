use crate::{Environment, FixtureRecord, Transaction};
use primitives::SpecId;
use state::{ExpectedState, State};
use std::sync::Arc;

/// State test as declared by a filler, before it is bound to a fork.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateTest {
    /// Explicit fixture name. Derived from the filler when absent.
    pub name: Option<String>,
    /// Block context.
    pub env: Environment,
    /// Accounts before execution.
    pub pre: State,
    /// Transactions, applied in order.
    pub txs: Vec<Transaction>,
    /// Expected accounts after execution.
    pub post: ExpectedState,
}

impl StateTest {
    /// Creates an unnamed test.
    pub fn new(env: Environment, pre: State, txs: Vec<Transaction>, post: ExpectedState) -> Self {
        Self {
            name: None,
            env,
            pre,
            txs,
            post,
        }
    }

    /// Gives the test an explicit name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Fixture bound to one fork.
///
/// Read only once built: every part is behind an [`Arc`] and only shared
/// references are handed out, so clones are cheap and can cross threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateTestCase {
    name: Arc<str>,
    fork: SpecId,
    env: Arc<Environment>,
    pre: Arc<State>,
    txs: Arc<[Transaction]>,
    post: Arc<ExpectedState>,
}

impl StateTestCase {
    /// Packages a fixture. The environment is used as given.
    pub fn new(
        name: impl Into<String>,
        env: Environment,
        pre: State,
        txs: Vec<Transaction>,
        post: ExpectedState,
        fork: SpecId,
    ) -> Self {
        Self {
            name: Arc::from(name.into()),
            fork,
            env: Arc::new(env),
            pre: Arc::new(pre),
            txs: Arc::from(txs),
            post: Arc::new(post),
        }
    }

    /// Fixture name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fork the fixture targets.
    pub fn fork(&self) -> SpecId {
        self.fork
    }

    /// Block context.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Accounts before execution.
    pub fn pre(&self) -> &State {
        &self.pre
    }

    /// Transactions in execution order.
    pub fn txs(&self) -> &[Transaction] {
        &self.txs
    }

    /// Expected accounts after execution.
    pub fn post(&self) -> &ExpectedState {
        &self.post
    }

    /// Serializable view of the fixture.
    pub fn to_record(&self) -> FixtureRecord<'_> {
        FixtureRecord::new(self)
    }

    /// Pretty printed JSON of [`to_record`](Self::to_record).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_record())
    }
}

/// Binds the tests of one filler to forks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureBuilder {
    filler_id: String,
}

impl FixtureBuilder {
    /// Creates a builder for the filler `filler_id`.
    pub fn new(filler_id: impl Into<String>) -> Self {
        Self {
            filler_id: filler_id.into(),
        }
    }

    /// Filler the fixtures are named after.
    pub fn filler_id(&self) -> &str {
        &self.filler_id
    }

    /// Name of the `index`th test of the filler, unless the test names itself.
    pub fn fixture_name(&self, index: usize, test: &StateTest) -> String {
        match &test.name {
            Some(name) => name.clone(),
            None => format!("{}_{index}", self.filler_id),
        }
    }

    /// Builds the fixture of the `index`th test for `fork`.
    ///
    /// Header fields mandated by `fork` are filled in when the test left them unset.
    pub fn build(&self, index: usize, test: &StateTest, fork: SpecId) -> StateTestCase {
        StateTestCase::new(
            self.fixture_name(index, test),
            test.env.clone().with_fork_requirements(fork),
            test.pre.clone(),
            test.txs.clone(),
            test.post.clone(),
            fork,
        )
    }

    /// Builds every test for `fork`, in declaration order.
    pub fn build_all(&self, tests: &[StateTest], fork: SpecId) -> Vec<StateTestCase> {
        tests
            .iter()
            .enumerate()
            .map(|(index, test)| self.build(index, test, fork))
            .collect()
    }
}
