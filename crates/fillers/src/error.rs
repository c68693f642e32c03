use crate::compiler::CompileError;
use bytecode::AssemblyError;
use primitives::{ForkError, SpecId};
use statetest_types::ValidationError;
use thiserror::Error;

/// Error raised while filling, tagged with the filler it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("filler: {filler}\nerror: {kind}")]
pub struct FillError {
    /// Id of the failing filler.
    pub filler: String,
    /// What went wrong.
    pub kind: FillErrorKind,
}

impl FillError {
    /// Tags `kind` with `filler`.
    pub fn new(filler: impl Into<String>, kind: impl Into<FillErrorKind>) -> Self {
        Self {
            filler: filler.into(),
            kind: kind.into(),
        }
    }
}

/// Specific kind of fill failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillErrorKind {
    /// Fork gate could not be resolved.
    #[error(transparent)]
    Fork(#[from] ForkError),
    /// Bytecode did not assemble.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    /// A transaction is inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Contract source could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// Two tests of one filler produced the same fixture name for a fork.
    #[error("duplicate fixture name {name} for {fork}")]
    DuplicateName {
        /// Clashing name.
        name: String,
        /// Fork both tests were built for.
        fork: SpecId,
    },
    /// The filler panicked.
    #[error("filler panicked: {0}")]
    Panic(String),
}
