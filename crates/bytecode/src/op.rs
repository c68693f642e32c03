//! Single assembler instruction: an opcode plus its optional push operand.

use crate::{opcode, AssemblyError, OpCode};
use core::fmt;
use primitives::{hex, U256};

/// One instruction of an assembly listing.
///
/// Push operands are kept as numbers. The byte layout (big-endian, left padded to
/// the opcode's immediate width) is only fixed when the instruction is encoded, so
/// `PUSH2 0x0001` and `PUSH2 0x01` are the same instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Op {
    opcode: OpCode,
    immediate: Option<U256>,
}

impl Op {
    /// Instruction without operand.
    #[inline]
    pub const fn new(opcode: OpCode) -> Self {
        Self {
            opcode,
            immediate: None,
        }
    }

    /// Instruction with an operand. The operand is range checked on encoding.
    #[inline]
    pub const fn with_immediate(opcode: OpCode, immediate: U256) -> Self {
        Self {
            opcode,
            immediate: Some(immediate),
        }
    }

    /// Narrowest `PUSHn` for `value`. Zero is pushed with `PUSH1`.
    pub fn push(value: U256) -> Self {
        let width = value.byte_len().max(1) as u8;
        // byte_len of a U256 is at most 32
        let opcode = opcode::push_for_width(width).unwrap_or(OpCode::PUSH32);
        Self::with_immediate(opcode, value)
    }

    /// `PUSH1 value`.
    #[inline]
    pub fn push1(value: u8) -> Self {
        Self::with_immediate(OpCode::PUSH1, U256::from(value))
    }

    /// `PUSH32 value`.
    #[inline]
    pub const fn push32(value: U256) -> Self {
        Self::with_immediate(OpCode::PUSH32, value)
    }

    /// Parses a mnemonic with an optional hex operand (`0x` prefix optional).
    pub fn parse(mnemonic: &str, immediate: Option<&str>) -> Result<Self, AssemblyError> {
        let opcode = OpCode::parse(mnemonic)
            .ok_or_else(|| AssemblyError::UnknownMnemonic(mnemonic.to_string()))?;
        let immediate = immediate.map(parse_hex_quantity).transpose()?;
        let op = Self { opcode, immediate };
        op.validate()?;
        Ok(op)
    }

    /// Opcode of the instruction.
    #[inline]
    pub const fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Push operand, if any.
    #[inline]
    pub const fn immediate(&self) -> Option<U256> {
        self.immediate
    }

    /// Encoded size in bytes.
    #[inline]
    pub const fn width(&self) -> usize {
        1 + self.opcode.immediate_size() as usize
    }

    /// Checks that the operand matches the opcode's immediate width.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        let width = self.opcode.immediate_size();
        match self.immediate {
            None if width > 0 => Err(AssemblyError::MissingImmediate(self.opcode)),
            Some(_) if width == 0 => Err(AssemblyError::UnexpectedImmediate(self.opcode)),
            Some(value) if value.byte_len() > width as usize => {
                Err(AssemblyError::ImmediateOverflow {
                    opcode: self.opcode,
                    value,
                    width,
                })
            }
            _ => Ok(()),
        }
    }

    /// Appends the encoding of this instruction to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), AssemblyError> {
        self.validate()?;
        out.push(self.opcode.get());
        if let Some(value) = self.immediate {
            let width = self.opcode.immediate_size();
            let bytes = value.to_be_bytes::<32>();
            out.extend_from_slice(&bytes[32 - width as usize..]);
        }
        Ok(())
    }
}

fn parse_hex_quantity(s: &str) -> Result<U256, AssemblyError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return Err(AssemblyError::InvalidImmediate(s.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| AssemblyError::InvalidImmediate(s.to_string()))
}

impl From<OpCode> for Op {
    #[inline]
    fn from(opcode: OpCode) -> Self {
        Self::new(opcode)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.as_str())?;
        if let Some(value) = self.immediate {
            let width = self.opcode.immediate_size();
            if value.byte_len() <= width as usize {
                let bytes = value.to_be_bytes::<32>();
                write!(f, " {}", hex::encode_prefixed(&bytes[32 - width as usize..]))?;
            } else {
                write!(f, " {value:#x}")?;
            }
        }
        Ok(())
    }
}
