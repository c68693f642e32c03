use crate::OpCode;
use primitives::{SpecId, U256};
use thiserror::Error;

/// Errors raised while assembling, disassembling or cross-checking bytecode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// Push operand does not fit the opcode's immediate width.
    #[error("{opcode} immediate {value:#x} does not fit in {width} bytes")]
    ImmediateOverflow {
        /// Push opcode.
        opcode: OpCode,
        /// Rejected value.
        value: U256,
        /// Immediate width in bytes.
        width: u8,
    },
    /// A push opcode was given without operand.
    #[error("{0} requires an immediate operand")]
    MissingImmediate(OpCode),
    /// A non-push opcode was given an operand.
    #[error("{0} does not take an immediate operand")]
    UnexpectedImmediate(OpCode),
    /// The mnemonic is not in the opcode table.
    #[error("unknown mnemonic {0:?}")]
    UnknownMnemonic(String),
    /// An operand could not be read as hex.
    #[error("invalid immediate {0:?}")]
    InvalidImmediate(String),
    /// The opcode does not exist yet in the target fork.
    #[error("{opcode} is not available before {introduced} (target {fork})")]
    NotActivated {
        /// Offending opcode.
        opcode: OpCode,
        /// Fork that introduced it.
        introduced: SpecId,
        /// Fork being assembled for.
        fork: SpecId,
    },
    /// Undefined opcode byte found while disassembling.
    #[error("unknown opcode 0x{opcode:02x} at offset {offset}")]
    UnknownOpcode {
        /// Raw byte.
        opcode: u8,
        /// Offset of the byte.
        offset: usize,
    },
    /// Bytecode ends in the middle of a push operand.
    #[error("{opcode} at offset {offset} needs {width} immediate bytes, {available} left")]
    TruncatedImmediate {
        /// Push opcode.
        opcode: OpCode,
        /// Offset of the push.
        offset: usize,
        /// Expected immediate width.
        width: u8,
        /// Bytes left after the opcode.
        available: usize,
    },
    /// Two encodings of the same program differ.
    #[error(
        "assembled and compiled bytecode differ at offset {offset} \
         (assembled {assembled_len} bytes, compiled {compiled_len} bytes)"
    )]
    AssemblyMismatch {
        /// First differing offset.
        offset: usize,
        /// Length of the hand-assembled code.
        assembled_len: usize,
        /// Length of the externally compiled code.
        compiled_len: usize,
    },
}
