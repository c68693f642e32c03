//! Generation driver: expands fillers over their forks and builds the fixtures.

use crate::{FillError, FillErrorKind, Filler};
use primitives::{ForkError, ForkRangeResolver, ForkRegistry, SpecId};
use statetest_types::{FixtureBuilder, StateTestCase, TestSuite};
use std::{
    any::Any,
    collections::BTreeSet,
    panic::{self, AssertUnwindSafe},
    thread,
};
use tracing::{debug, info, warn};

/// Knobs of a fill run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillConfig {
    /// Drop forks before this one, whatever the filler declares.
    pub from: Option<SpecId>,
    /// Drop this fork and every later one.
    pub until: Option<SpecId>,
    /// Only run fillers whose id contains this string.
    pub filter: Option<String>,
    /// Build the forks of a filler one after the other on the calling thread.
    pub single_thread: bool,
}

impl FillConfig {
    /// Returns `true` if the filler `id` passes the filter.
    pub fn selects(&self, id: &str) -> bool {
        self.filter.as_deref().is_none_or(|filter| id.contains(filter))
    }

    /// Forks `filler` is filled for: its declared selection intersected with the
    /// configured bounds, in registry order.
    pub fn forks(
        &self,
        filler: &dyn Filler,
        registry: &ForkRegistry,
    ) -> Result<Vec<SpecId>, ForkError> {
        let declared = ForkRangeResolver::new(registry).resolve_selection(&filler.forks())?;
        if let (Some(from), Some(until)) = (self.from, self.until) {
            if registry.rank(from)? > registry.rank(until)? {
                return Err(ForkError::InvalidRange { from, until });
            }
        }
        let from = self.from.map(|fork| registry.rank(fork)).transpose()?;
        let until = self.until.map(|fork| registry.rank(fork)).transpose()?;
        Ok(declared
            .into_iter()
            .filter(|fork| {
                registry.rank(*fork).is_ok_and(|rank| {
                    from.is_none_or(|from| rank >= from) && until.is_none_or(|until| rank < until)
                })
            })
            .collect())
    }
}

/// Builds every fixture of `filler`.
///
/// Each fork is filled independently, on its own scoped thread unless
/// [`FillConfig::single_thread`] is set. Fixtures come back in registry order and,
/// within a fork, in declaration order. The first failing fork fails the filler.
pub fn fill(
    filler: &dyn Filler,
    registry: &ForkRegistry,
    config: &FillConfig,
) -> Result<Vec<StateTestCase>, FillError> {
    let id = filler.id();
    let forks = config
        .forks(filler, registry)
        .map_err(|e| FillError::new(id, e))?;
    debug!(filler = id, selection = %filler.forks(), forks = forks.len(), "resolved forks");

    let results = if config.single_thread || forks.len() < 2 {
        forks
            .iter()
            .map(|&fork| fill_fork(filler, fork))
            .collect::<Vec<_>>()
    } else {
        thread::scope(|scope| {
            let handles = forks
                .iter()
                .map(|&fork| scope.spawn(move || fill_fork(filler, fork)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| Err(FillErrorKind::Panic(panic_message(payload))))
                })
                .collect::<Vec<_>>()
        })
    };

    let mut cases = Vec::new();
    for (fork, result) in forks.iter().zip(results) {
        match result {
            Ok(built) => {
                debug!(filler = id, %fork, fixtures = built.len(), "filled fork");
                cases.extend(built);
            }
            Err(kind) => {
                warn!(filler = id, %fork, error = %kind, "fill failed");
                return Err(FillError::new(id, kind));
            }
        }
    }
    info!(filler = id, forks = forks.len(), fixtures = cases.len(), "filled");
    Ok(cases)
}

/// Fills every selected filler, in the given order. Each suite is keyed by its filler id.
pub fn fill_all<'a>(
    fillers: impl IntoIterator<Item = &'a dyn Filler>,
    registry: &ForkRegistry,
    config: &FillConfig,
) -> Result<Vec<(String, TestSuite)>, FillError> {
    fillers
        .into_iter()
        .filter(|filler| config.selects(filler.id()))
        .map(|filler| Ok((filler.id().to_string(), TestSuite(fill(filler, registry, config)?))))
        .collect()
}

fn fill_fork(filler: &dyn Filler, fork: SpecId) -> Result<Vec<StateTestCase>, FillErrorKind> {
    let tests = panic::catch_unwind(AssertUnwindSafe(|| filler.fill(fork)))
        .map_err(|payload| FillErrorKind::Panic(panic_message(payload)))??;
    let cases = FixtureBuilder::new(filler.id()).build_all(&tests, fork);

    let mut names = BTreeSet::new();
    for case in &cases {
        if !names.insert(case.name()) {
            return Err(FillErrorKind::DuplicateName {
                name: case.name().to_string(),
                fork,
            });
        }
    }
    Ok(cases)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
