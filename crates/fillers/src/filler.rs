//! Test declarations generated per fork.

use crate::FillErrorKind;
use core::fmt;
use primitives::{ForkSelection, SpecId};
use statetest_types::StateTest;

/// A named generator of state tests, gated to a set of forks.
///
/// Fillers are shared between fill workers, so they are immutable once registered.
pub trait Filler: Send + Sync {
    /// Unique id, used as the prefix of derived fixture names.
    fn id(&self) -> &str;

    /// Forks this filler applies to.
    fn forks(&self) -> ForkSelection;

    /// Declares the tests for `fork`. Called once per applicable fork.
    fn fill(&self, fork: SpecId) -> Result<Vec<StateTest>, FillErrorKind>;
}

/// Signature of a filler body.
pub type FillFn = fn(SpecId) -> Result<Vec<StateTest>, FillErrorKind>;

/// [`Filler`] backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnFiller {
    id: &'static str,
    forks: ForkSelection,
    fill: FillFn,
}

impl FnFiller {
    /// Creates a filler running `fill` for every fork in `forks`.
    pub const fn new(id: &'static str, forks: ForkSelection, fill: FillFn) -> Self {
        Self { id, forks, fill }
    }
}

impl fmt::Debug for FnFiller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFiller")
            .field("id", &self.id)
            .field("forks", &self.forks)
            .finish_non_exhaustive()
    }
}

impl Filler for FnFiller {
    fn id(&self) -> &str {
        self.id
    }

    fn forks(&self) -> ForkSelection {
        self.forks
    }

    fn fill(&self, fork: SpecId) -> Result<Vec<StateTest>, FillErrorKind> {
        (self.fill)(fork)
    }
}
