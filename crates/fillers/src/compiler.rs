//! Seam to the external high-level compiler, and the cross check against hand
//! assembled code.

use crate::FillErrorKind;
use bytecode::{assemble, ensure_equivalent, Op};
use primitives::Bytes;
use std::collections::BTreeMap;
use thiserror::Error;

/// Compiler errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The compiler has no output for the source.
    #[error("no compiled output for source `{0}`")]
    UnknownSource(String),
    /// The compiler rejected the source.
    #[error("compilation failed: {0}")]
    Failed(String),
}

/// Turns structured contract source into deployed bytecode.
pub trait Compiler: Send + Sync {
    /// Compiles `source`.
    fn compile(&self, source: &str) -> Result<Bytes, CompileError>;
}

/// Compiler answering from previously recorded outputs.
///
/// Sources are matched after collapsing whitespace, so indentation changes in a
/// filler do not invalidate a recorded output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinnedCompiler {
    outputs: BTreeMap<String, Bytes>,
}

impl PinnedCompiler {
    /// Creates a compiler without outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiler holding the outputs of every shipped filler source.
    pub fn builtin() -> Self {
        crate::vm::comparison_operators::pinned_outputs()
            .into_iter()
            .fold(Self::new(), |compiler, (source, code)| {
                compiler.with_output(&source, code)
            })
    }

    /// Records `code` as the output of `source`.
    pub fn with_output(mut self, source: &str, code: impl Into<Bytes>) -> Self {
        self.insert(source, code);
        self
    }

    /// Records `code` as the output of `source`, replacing any earlier output.
    pub fn insert(&mut self, source: &str, code: impl Into<Bytes>) -> Option<Bytes> {
        self.outputs.insert(normalize(source), code.into())
    }

    /// Number of recorded outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl Compiler for PinnedCompiler {
    fn compile(&self, source: &str) -> Result<Bytes, CompileError> {
        let key = normalize(source);
        match self.outputs.get(&key) {
            Some(code) => Ok(code.clone()),
            None => Err(CompileError::UnknownSource(key)),
        }
    }
}

fn normalize(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compiles `source` and checks it byte for byte against the assembled `ops`.
///
/// Returns the compiled code. Any divergence fails with
/// [`AssemblyError::AssemblyMismatch`](bytecode::AssemblyError::AssemblyMismatch).
pub fn cross_check(
    compiler: &dyn Compiler,
    source: &str,
    ops: &[Op],
) -> Result<Bytes, FillErrorKind> {
    let assembled = assemble(ops)?;
    let compiled = compiler.compile(source)?;
    ensure_equivalent(&assembled, &compiled)?;
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytecode::{AssemblyError, OpCode};
    use primitives::bytes;

    const SOURCE: &str = "{ sstore(0, lt(0, 1)) }";

    fn ops() -> Vec<Op> {
        vec![
            Op::push1(1),
            Op::push1(0),
            OpCode::LT.into(),
            Op::push1(0),
            OpCode::SSTORE.into(),
        ]
    }

    #[test]
    fn matches_modulo_whitespace() {
        let compiler = PinnedCompiler::new().with_output(SOURCE, bytes!("600160001060005500"));
        assert_eq!(
            compiler.compile("{\n    sstore(0, lt(0, 1))\n}"),
            Ok(bytes!("600160001060005500"))
        );
    }

    #[test]
    fn unknown_source() {
        assert_eq!(
            PinnedCompiler::new().compile(SOURCE),
            Err(CompileError::UnknownSource(SOURCE.to_string()))
        );
    }

    #[test]
    fn cross_check_accepts_identical_encodings() {
        let compiler = PinnedCompiler::new().with_output(SOURCE, bytes!("6001600010600055"));
        assert_eq!(
            cross_check(&compiler, SOURCE, &ops()),
            Ok(bytes!("6001600010600055"))
        );
    }

    #[test]
    fn cross_check_fails_fast_on_divergence() {
        let compiler = PinnedCompiler::new().with_output(SOURCE, bytes!("6001600011600055"));
        assert_eq!(
            cross_check(&compiler, SOURCE, &ops()),
            Err(FillErrorKind::Assembly(AssemblyError::AssemblyMismatch {
                offset: 4,
                assembled_len: 8,
                compiled_len: 8,
            }))
        );
    }

    #[test]
    fn builtin_covers_comparison_sources() {
        assert_eq!(PinnedCompiler::builtin().len(), 4);
    }
}
