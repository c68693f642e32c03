//! Encoding of instruction sequences and byte-level comparison of encodings.

use crate::{AssemblyError, Op};
use primitives::{Bytes, SpecId};

/// Encodes `ops` back to back.
///
/// The output length is the sum of [`Op::width`] over `ops`. Fails on the first
/// instruction whose operand does not match its opcode.
pub fn assemble<'a>(ops: impl IntoIterator<Item = &'a Op>) -> Result<Bytes, AssemblyError> {
    let mut code = Vec::new();
    for op in ops {
        op.encode_into(&mut code)?;
    }
    Ok(code.into())
}

/// Same as [`assemble`], rejecting opcodes that `fork` does not have yet.
pub fn assemble_for<'a>(
    ops: impl IntoIterator<Item = &'a Op>,
    fork: SpecId,
) -> Result<Bytes, AssemblyError> {
    let mut code = Vec::new();
    for op in ops {
        let opcode = op.opcode();
        if !opcode.is_enabled_in(fork) {
            return Err(AssemblyError::NotActivated {
                opcode,
                introduced: opcode.info().introduced(),
                fork,
            });
        }
        op.encode_into(&mut code)?;
    }
    Ok(code.into())
}

/// Size of the encoding of `ops`, without encoding them.
pub fn encoded_len<'a>(ops: impl IntoIterator<Item = &'a Op>) -> usize {
    ops.into_iter().map(Op::width).sum()
}

/// Exact byte comparison.
#[inline]
pub fn equivalent(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// Fails with [`AssemblyError::AssemblyMismatch`] unless both encodings are identical.
///
/// The reported offset is the first differing byte, or the length of the shorter
/// input when one is a prefix of the other.
pub fn ensure_equivalent(assembled: &[u8], compiled: &[u8]) -> Result<(), AssemblyError> {
    if equivalent(assembled, compiled) {
        return Ok(());
    }
    let offset = assembled
        .iter()
        .zip(compiled)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| assembled.len().min(compiled.len()));
    Err(AssemblyError::AssemblyMismatch {
        offset,
        assembled_len: assembled.len(),
        compiled_len: compiled.len(),
    })
}
