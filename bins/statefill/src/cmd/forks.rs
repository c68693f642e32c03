//! `forks`: print the fork registry.

use clap::Parser;
use primitives::ForkRegistry;

/// `forks` subcommand
#[derive(Parser, Debug)]
pub struct Cmd {}

impl Cmd {
    /// Prints every registered fork with its rank.
    pub fn run(&self) {
        print!("{}", listing(ForkRegistry::mainnet()));
    }
}

fn listing(registry: &ForkRegistry) -> String {
    registry
        .iter()
        .enumerate()
        .map(|(rank, fork)| format!("{rank:>2} {fork}\n"))
        .collect()
}
