//! Subcommands.

pub mod assemble;
pub mod bytecode;
pub mod fill;
pub mod forks;

use clap::{Parser, Subcommand};
use tracing::Level;

/// Generate EVM state test fixtures.
#[derive(Parser, Debug)]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    /// Default log level, overridden by `RUST_LOG`
    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,
    /// Command to run
    #[command(subcommand)]
    pub command: MainCmd,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum MainCmd {
    /// Fill the shipped fillers into fixtures
    Fill(fill::Cmd),
    /// List the fork registry
    Forks(forks::Cmd),
    /// Disassemble bytecode
    Bytecode(bytecode::Cmd),
    /// Assemble `MNEMONIC[:0xIMMEDIATE]` tokens
    Assemble(assemble::Cmd),
}

/// Errors of any subcommand.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filling failed.
    #[error(transparent)]
    Fill(#[from] fillers::FillError),
    /// Bad fork arguments.
    #[error(transparent)]
    Fork(#[from] primitives::ForkError),
    /// Code did not assemble or disassemble.
    #[error(transparent)]
    Assembly(#[from] ::bytecode::AssemblyError),
    /// Input is not hex.
    #[error("invalid hex: {0}")]
    Hex(#[from] primitives::hex::FromHexError),
    /// Fixture serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Writing fixtures failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MainCmd {
    /// Runs the subcommand.
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Fill(cmd) => cmd.run(),
            Self::Forks(cmd) => {
                cmd.run();
                Ok(())
            }
            Self::Bytecode(cmd) => cmd.run(),
            Self::Assemble(cmd) => cmd.run(),
        }
    }
}
