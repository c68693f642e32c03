//! `assemble`: encode instruction tokens.

use super::Error;
use ::bytecode::{assemble, assemble_for, AssemblyError, Op};
use clap::Parser;
use primitives::{hex, SpecId};

/// `assemble` subcommand
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Instructions, e.g. `PUSH1:0x01 PUSH1:0x00 LT`
    #[arg(required = true, num_args = 1..)]
    ops: Vec<String>,
    /// Reject instructions not yet active in this fork
    #[arg(long)]
    fork: Option<SpecId>,
}

impl Cmd {
    /// Prints the assembled code as hex.
    pub fn run(&self) -> Result<(), Error> {
        let ops = self
            .ops
            .iter()
            .map(|token| parse_token(token))
            .collect::<Result<Vec<_>, _>>()?;
        let code = match self.fork {
            Some(fork) => assemble_for(&ops, fork)?,
            None => assemble(&ops)?,
        };
        println!("{}", hex::encode_prefixed(code));
        Ok(())
    }
}

/// Parses `MNEMONIC` or `MNEMONIC:IMMEDIATE`.
fn parse_token(token: &str) -> Result<Op, AssemblyError> {
    match token.split_once(':') {
        Some((mnemonic, immediate)) => Op::parse(mnemonic, Some(immediate)),
        None => Op::parse(token, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::bytecode::OpCode;
    use primitives::U256;
    use rstest::rstest;

    #[rstest]
    #[case::plain("LT", Op::new(OpCode::LT))]
    #[case::lowercase("sstore", Op::new(OpCode::SSTORE))]
    #[case::immediate("PUSH2:0x0102", Op::with_immediate(OpCode::PUSH2, U256::from(0x0102)))]
    fn tokens(#[case] token: &str, #[case] expected: Op) {
        assert_eq!(parse_token(token), Ok(expected));
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(
            parse_token("PUSH33:0x01"),
            Err(AssemblyError::UnknownMnemonic("PUSH33".to_string()))
        );
    }
}
