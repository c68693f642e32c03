//! State test fillers and the driver that expands them into fixtures.
//!
//! A [`Filler`] declares tests for the forks it applies to. [`fill`] resolves those
//! forks against a [`ForkRegistry`](primitives::ForkRegistry) and binds every
//! declaration to every fork.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod compiler;
mod error;
mod fill;
mod filler;
pub mod vm;

pub use compiler::{cross_check, CompileError, Compiler, PinnedCompiler};
pub use error::{FillError, FillErrorKind};
pub use fill::{fill, fill_all, FillConfig};
pub use filler::{FillFn, Filler, FnFiller};
pub use vm::all_fillers;
