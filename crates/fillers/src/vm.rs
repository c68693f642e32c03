//! Fillers for individual EVM instructions.

pub mod comparison_operators;
pub mod swap;

use crate::{compiler::PinnedCompiler, Filler};
use std::sync::Arc;

/// Every shipped filler, in a fixed order. Sources are compiled with
/// [`PinnedCompiler::builtin`].
pub fn all_fillers() -> Vec<Box<dyn Filler>> {
    let compiler = Arc::new(PinnedCompiler::builtin());
    let mut fillers: Vec<Box<dyn Filler>> = comparison_operators::fillers(compiler)
        .into_iter()
        .map(|filler| Box::new(filler) as Box<dyn Filler>)
        .collect();
    fillers.push(Box::new(swap::TEST_SWAP));
    fillers
}
