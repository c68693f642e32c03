use crate::{AssemblyError, Op, OpCode};
use core::fmt::Write;
use primitives::U256;

/// Iterator decoding bytecode into [`Op`]s with their offsets.
///
/// Decoding stops after the first error.
#[derive(Debug, Clone)]
pub struct OpIter<'a> {
    code: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> OpIter<'a> {
    /// Creates a new iterator over raw bytecode.
    #[inline]
    pub fn new(code: &'a [u8]) -> Self {
        Self {
            code,
            position: 0,
            failed: false,
        }
    }

    /// Returns the current position in the bytecode.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the bytes that have not been decoded yet.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.code[self.position.min(self.code.len())..]
    }

    fn decode_next(&mut self, byte: u8) -> Result<(usize, Op), AssemblyError> {
        let offset = self.position;
        let opcode = OpCode::new(byte).ok_or(AssemblyError::UnknownOpcode {
            opcode: byte,
            offset,
        })?;
        let width = opcode.immediate_size();
        let start = offset + 1;
        let rest = &self.code[start..];
        if rest.len() < width as usize {
            return Err(AssemblyError::TruncatedImmediate {
                opcode,
                offset,
                width,
                available: rest.len(),
            });
        }
        self.position = start + width as usize;
        if width == 0 {
            return Ok((offset, Op::new(opcode)));
        }
        // At most 32 bytes, so this always fits.
        let value = U256::try_from_be_slice(&rest[..width as usize]).unwrap_or_default();
        Ok((offset, Op::with_immediate(opcode, value)))
    }
}

impl Iterator for OpIter<'_> {
    type Item = Result<(usize, Op), AssemblyError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let byte = *self.code.get(self.position)?;
        let item = self.decode_next(byte);
        self.failed = item.is_err();
        Some(item)
    }
}

/// Decodes a whole bytecode. This is the inverse of [`assemble`](crate::assemble).
pub fn disassemble(code: &[u8]) -> Result<Vec<(usize, Op)>, AssemblyError> {
    OpIter::new(code).collect()
}

/// Human readable listing, one `offset: instruction` line per op.
pub fn listing(code: &[u8]) -> Result<String, AssemblyError> {
    let mut out = String::new();
    for item in OpIter::new(code) {
        let (offset, op) = item?;
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{offset:04x}: {op}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::bytes;

    #[test]
    fn iterates_with_offsets() {
        let code = bytes!("601b565b00");
        let ops = disassemble(&code).unwrap();
        assert_eq!(
            ops,
            vec![
                (0, Op::push1(0x1b)),
                (2, Op::new(OpCode::JUMP)),
                (3, Op::new(OpCode::JUMPDEST)),
                (4, Op::new(OpCode::STOP)),
            ]
        );
    }

    #[test]
    fn unknown_opcode() {
        let code = [0x60, 0x00, 0x0c];
        assert_eq!(
            disassemble(&code),
            Err(AssemblyError::UnknownOpcode {
                opcode: 0x0c,
                offset: 2
            })
        );
    }

    #[test]
    fn truncated_push() {
        let code = [0x00, 0x62, 0x01];
        assert_eq!(
            disassemble(&code),
            Err(AssemblyError::TruncatedImmediate {
                opcode: OpCode::PUSH3,
                offset: 1,
                width: 3,
                available: 1,
            })
        );
    }

    #[test]
    fn stops_after_error() {
        let mut iter = OpIter::new(&[0x0c, 0x00]);
        assert!(matches!(iter.next(), Some(Err(_))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn listing_format() {
        let listing = listing(&bytes!("610001600010")).unwrap();
        assert_eq!(listing, "0000: PUSH2 0x0001\n0003: PUSH1 0x00\n0005: LT\n");
    }

    #[test]
    fn empty_code() {
        assert_eq!(disassemble(&[]), Ok(vec![]));
    }
}
