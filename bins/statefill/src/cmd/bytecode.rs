//! `bytecode`: disassemble hex into a listing.

use super::Error;
use clap::Parser;
use primitives::hex;

/// `bytecode` subcommand
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Bytecode in hex format, `0x` prefix optional
    #[arg(required = true)]
    bytes: String,
}

impl Cmd {
    /// Prints the disassembly listing.
    pub fn run(&self) -> Result<(), Error> {
        let code = hex::decode(self.bytes.trim())?;
        print!("{}", ::bytecode::listing(&code)?);
        Ok(())
    }
}
