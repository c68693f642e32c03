//! Ordered catalog of the forks fixtures are generated for.

use crate::hardfork::SpecId;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while looking up or expanding forks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForkError {
    /// The fork is not part of the registry (or the name is not a fork at all).
    #[error("unknown fork: {0}")]
    UnknownFork(String),
    /// `from` comes after `until` in the registry.
    #[error("invalid fork range: {from} is after {until}")]
    InvalidRange {
        /// Lower bound of the rejected range.
        from: SpecId,
        /// Upper bound of the rejected range.
        until: SpecId,
    },
    /// The fork was registered twice.
    #[error("fork {0} is already registered")]
    DuplicateFork(SpecId),
    /// Registering the fork would break the protocol ordering.
    #[error("fork {fork} cannot be registered after {last}")]
    OutOfOrder {
        /// Fork that was being registered.
        fork: SpecId,
        /// Last fork currently in the registry.
        last: SpecId,
    },
}

/// Forks with execution changes, in activation order.
///
/// Difficulty bomb delays and the DAO fork do not change the EVM and are left out,
/// `Osaka` is not scheduled yet.
const MAINNET_FORKS: [SpecId; 14] = [
    SpecId::FRONTIER,
    SpecId::HOMESTEAD,
    SpecId::TANGERINE,
    SpecId::SPURIOUS_DRAGON,
    SpecId::BYZANTIUM,
    SpecId::CONSTANTINOPLE,
    SpecId::PETERSBURG,
    SpecId::ISTANBUL,
    SpecId::BERLIN,
    SpecId::LONDON,
    SpecId::MERGE,
    SpecId::SHANGHAI,
    SpecId::CANCUN,
    SpecId::PRAGUE,
];

static MAINNET: OnceLock<ForkRegistry> = OnceLock::new();

/// Totally ordered list of forks.
///
/// Registration order is the rank. Forks must be registered in protocol order and
/// at most once, so the rank always agrees with [`SpecId`]'s ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForkRegistry {
    forks: Vec<SpecId>,
}

impl ForkRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self { forks: Vec::new() }
    }

    /// Creates a registry from forks given in rank order.
    pub fn from_forks(forks: impl IntoIterator<Item = SpecId>) -> Result<Self, ForkError> {
        let mut registry = Self::new();
        for fork in forks {
            registry.register(fork)?;
        }
        Ok(registry)
    }

    /// Process-wide registry of mainnet forks.
    ///
    /// Initialized on first use and never written afterwards.
    pub fn mainnet() -> &'static Self {
        MAINNET.get_or_init(|| Self {
            forks: MAINNET_FORKS.to_vec(),
        })
    }

    /// Appends `fork` with the next rank.
    pub fn register(&mut self, fork: SpecId) -> Result<usize, ForkError> {
        if self.contains(fork) {
            return Err(ForkError::DuplicateFork(fork));
        }
        if let Some(&last) = self.forks.last() {
            if fork < last {
                return Err(ForkError::OutOfOrder { fork, last });
            }
        }
        self.forks.push(fork);
        Ok(self.forks.len() - 1)
    }

    /// Returns the rank of `fork`.
    pub fn rank(&self, fork: SpecId) -> Result<usize, ForkError> {
        self.forks
            .iter()
            .position(|f| *f == fork)
            .ok_or_else(|| ForkError::UnknownFork(fork.name().to_string()))
    }

    /// Looks a fork up by name and returns it if it is registered.
    pub fn fork_by_name(&self, name: &str) -> Result<SpecId, ForkError> {
        let fork: SpecId = name
            .parse()
            .map_err(|_| ForkError::UnknownFork(name.to_string()))?;
        self.rank(fork).map(|_| fork)
    }

    /// Returns `true` if `fork` is registered.
    pub fn contains(&self, fork: SpecId) -> bool {
        self.forks.contains(&fork)
    }

    /// Forks `f` with `rank(from) <= rank(f) < rank(until)`, in rank order.
    ///
    /// An empty range (`from == until`) yields no forks, a reversed one is an error.
    pub fn all_between(&self, from: SpecId, until: SpecId) -> Result<Vec<SpecId>, ForkError> {
        let start = self.rank(from)?;
        let end = self.rank(until)?;
        if start > end {
            return Err(ForkError::InvalidRange { from, until });
        }
        Ok(self.forks[start..end].to_vec())
    }

    /// Every fork from `from` up to and including the latest one.
    pub fn all_from(&self, from: SpecId) -> Result<Vec<SpecId>, ForkError> {
        let start = self.rank(from)?;
        Ok(self.forks[start..].to_vec())
    }

    /// Fork ranked right after `fork`, if any.
    pub fn successor(&self, fork: SpecId) -> Result<Option<SpecId>, ForkError> {
        let rank = self.rank(fork)?;
        Ok(self.forks.get(rank + 1).copied())
    }

    /// Fork ranked right before `fork`, if any.
    pub fn predecessor(&self, fork: SpecId) -> Result<Option<SpecId>, ForkError> {
        let rank = self.rank(fork)?;
        Ok(rank.checked_sub(1).map(|r| self.forks[r]))
    }

    /// Highest ranked fork.
    pub fn latest(&self) -> Option<SpecId> {
        self.forks.last().copied()
    }

    /// Iterates over the forks in rank order.
    pub fn iter(&self) -> impl Iterator<Item = SpecId> + '_ {
        self.forks.iter().copied()
    }

    /// Number of registered forks.
    pub fn len(&self) -> usize {
        self.forks.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }
}
