use super::OpCode;
use crate::opcode::NAME_TO_OPCODE;
use core::fmt;

/// An error indicating that an opcode mnemonic is unknown.
#[derive(Debug, PartialEq, Eq)]
pub struct OpCodeError(pub(crate) ());

impl fmt::Display for OpCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown opcode mnemonic")
    }
}

impl core::error::Error for OpCodeError {}

impl core::str::FromStr for OpCode {
    type Err = OpCodeError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(OpCodeError(()))
    }
}

impl OpCode {
    /// Parses an opcode from its mnemonic. This is the inverse of [`as_str`](Self::as_str).
    ///
    /// Lowercase mnemonics are accepted as well.
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        NAME_TO_OPCODE
            .get(s)
            .or_else(|| NAME_TO_OPCODE.get(s.to_ascii_uppercase().as_str()))
            .copied()
    }
}
