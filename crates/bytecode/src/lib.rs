//! Legacy EVM opcode table, assembler and disassembler.
//!
//! Programs are written as sequences of [`Op`]s (an opcode and, for the `PUSHn`
//! family, an operand of the opcode's fixed width) and encoded with [`assemble`].
//! [`ensure_equivalent`] compares the result with an independently produced encoding.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod assembler;
mod error;
/// Iterator for the bytecode.
mod iter;
pub mod op;
pub mod opcode;

pub use assembler::{assemble, assemble_for, encoded_len, ensure_equivalent, equivalent};
pub use error::AssemblyError;
pub use iter::{disassemble, listing, OpIter};
pub use op::Op;
pub use opcode::{OpCode, OpCodeInfo};
