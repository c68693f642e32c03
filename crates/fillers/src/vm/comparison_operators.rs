//! `LT`, `GT`, `SLT` and `SGT`, driven through a small contract.
//!
//! The contract wraps the comparison in `f(a, b)`, which returns `1` when it holds
//! and `0xff` otherwise, and stores `f` of a fixed list of operand pairs in
//! consecutive slots. The hand assembled program is cross checked against the
//! compiled high-level source before a fixture is emitted.

use crate::{
    compiler::{cross_check, Compiler},
    FillErrorKind, Filler,
};
use bytecode::{encoded_len, opcode, AssemblyError, Op, OpCode};
use core::fmt;
use primitives::{
    address, hex, Address, Bytes, ForkRange, ForkSelection, SpecId, TEST_ADDRESS, U256,
};
use state::{Account, ExpectedAccount, ExpectedState, State, Storage};
use statetest_types::{Environment, StateTest, Transaction, TxType};
use std::sync::Arc;

/// Address of the contract under test.
pub const CONTRACT: Address = address!("0x1000000000000000000000000000000000000000");

const BALANCE: u64 = 0x0BA1A9CE0BA1A9CE;

/// Value `f` returns when the comparison does not hold.
const NOT_TAKEN: u64 = 0xff;

const FORKS: ForkSelection = ForkSelection::Range(ForkRange::new(SpecId::BERLIN, SpecId::SHANGHAI));

const UNSIGNED_SOURCE: &str = "
{
    function f(a, b) -> c
    {
        c := 0xff
        if $op(a, b) { c := 1 }
    }
    sstore(0, f(0, 1))
    sstore(1, f(1, 2))
    sstore(2, f(0, 0))
    sstore(3, f(1, 1))
    sstore(4, f(1, 0))
    sstore(5, f(2, 1))
    return(0, 32)
}
";

const SIGNED_SOURCE: &str = "
{
    function f(a, b) -> c {
        c := 0xff
        if $op(a, b) { c := 1 }
    }
    let minus1 := 0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff
    let minus2 := 0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe
    let minus3 := 0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffd
    sstore(0, f(minus1, 0))
    sstore(1, f(minus3, minus2))
    sstore(2, f(0, 1))
    sstore(3, f(minus1, minus1))
    sstore(4, f(0, 0))
    sstore(5, f(1, 1))
    sstore(6, f(0, minus1))
    sstore(7, f(minus2, minus3))
    sstore(8, f(1, 0))
    return(0, 32)
}
";

/// Operand of a call to `f`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Arg {
    /// Small literal.
    Lit(u8),
    /// `minus1`, `minus2` or `minus3`, by index.
    Var(u8),
}

use Arg::{Lit, Var};

const UNSIGNED_CALLS: &[(Arg, Arg)] = &[
    (Lit(0), Lit(1)),
    (Lit(1), Lit(2)),
    (Lit(0), Lit(0)),
    (Lit(1), Lit(1)),
    (Lit(1), Lit(0)),
    (Lit(2), Lit(1)),
];

const SIGNED_CALLS: &[(Arg, Arg)] = &[
    (Var(0), Lit(0)),
    (Var(2), Var(1)),
    (Lit(0), Lit(1)),
    (Var(0), Var(0)),
    (Lit(0), Lit(0)),
    (Lit(1), Lit(1)),
    (Lit(0), Var(0)),
    (Var(1), Var(2)),
    (Lit(1), Lit(0)),
];

/// One comparison opcode and everything its fixture needs.
#[derive(Clone, Copy, Debug)]
pub struct Comparison {
    name: &'static str,
    opcode: OpCode,
    signed: bool,
    /// Expected value of each slot, in call order.
    expected: &'static [u64],
    /// Deployed code of the compiled source.
    compiled: &'static [u8],
}

/// `LT`.
pub const LT: Comparison = Comparison {
    name: "lt",
    opcode: OpCode::LT,
    signed: false,
    expected: &[0x01, 0x01, 0xff, 0xff, 0xff, 0xff],
    compiled: &hex!("601b565b600060ff905082821015601557600190505b92915050565b6025600160006003565b6000556032600260016003565b600155603e6000806003565b600255604a6001806003565b6003556057600060016003565b6004556064600160026003565b60055560206000f3"),
};

/// `GT`.
pub const GT: Comparison = Comparison {
    name: "gt",
    opcode: OpCode::GT,
    signed: false,
    expected: &[0xff, 0xff, 0xff, 0xff, 0x01, 0x01],
    compiled: &hex!("601b565b600060ff905082821115601557600190505b92915050565b6025600160006003565b6000556032600260016003565b600155603e6000806003565b600255604a6001806003565b6003556057600060016003565b6004556064600160026003565b60055560206000f3"),
};

/// `SLT`.
pub const SLT: Comparison = Comparison {
    name: "slt",
    opcode: OpCode::SLT,
    signed: true,
    expected: &[0x01, 0x01, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
    compiled: &hex!("601b565b600060ff905082821215601557600190505b92915050565b7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe7ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffd60876000846003565b600055609282826003565b600155609f600160006003565b60025560aa83846003565b60035560b66000806003565b60045560c26001806003565b60055560ce8360006003565b60065560d981836003565b60075560e6600060016003565b60085560206000f3"),
};

/// `SGT`.
pub const SGT: Comparison = Comparison {
    name: "sgt",
    opcode: OpCode::SGT,
    signed: true,
    expected: &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01, 0x01, 0x01],
    compiled: &hex!("601b565b600060ff905082821315601557600190505b92915050565b7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe7ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffd60876000846003565b600055609282826003565b600155609f600160006003565b60025560aa83846003565b60035560b66000806003565b60045560c26001806003565b60055560ce8360006003565b60065560d981836003565b60075560e6600060016003565b60085560206000f3"),
};

/// Every comparison with a filler.
pub const ALL: [Comparison; 4] = [LT, GT, SLT, SGT];

impl Comparison {
    /// Opcode under test.
    pub const fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Id of the filler exercising this comparison.
    pub fn filler_id(&self) -> String {
        format!("vm/comparison_operators/test_{}", self.name)
    }

    /// High-level source of the contract.
    pub fn source(&self) -> String {
        let template = if self.signed {
            SIGNED_SOURCE
        } else {
            UNSIGNED_SOURCE
        };
        template.replace("$op", self.name)
    }

    /// Deployed code of [`source`](Self::source) as recorded from the compiler.
    pub fn compiled(&self) -> Bytes {
        Bytes::from_static(self.compiled)
    }

    /// Storage the contract is expected to leave behind.
    pub fn expected_storage(&self) -> Storage {
        self.expected
            .iter()
            .enumerate()
            .map(|(slot, value)| (U256::from(slot), U256::from(*value)))
            .collect()
    }

    fn calls(&self) -> &'static [(Arg, Arg)] {
        if self.signed {
            SIGNED_CALLS
        } else {
            UNSIGNED_CALLS
        }
    }

    fn constants(&self) -> &'static [U256] {
        const MINUS: [U256; 3] = [
            U256::MAX,
            U256::from_limbs([u64::MAX - 1, u64::MAX, u64::MAX, u64::MAX]),
            U256::from_limbs([u64::MAX - 2, u64::MAX, u64::MAX, u64::MAX]),
        ];
        if self.signed {
            &MINUS
        } else {
            &[]
        }
    }

    /// Hand assembled rendition of [`source`](Self::source).
    ///
    /// Layout: a jump over the body of `f`, the body (entered at offset 3 with the
    /// return label and both operands on the stack), the `minusN` constants, then
    /// one call and `SSTORE` per operand pair, and `RETURN(0, 32)`.
    pub fn program(&self) -> Result<Vec<Op>, FillErrorKind> {
        let mut ops = vec![label(0), OpCode::JUMP.into()];
        let entry = encoded_len(&ops);
        ops.extend([
            OpCode::JUMPDEST.into(),
            Op::push1(0),
            Op::push1(NOT_TAKEN as u8),
            OpCode::SWAP1.into(),
            OpCode::POP.into(),
            OpCode::DUP3.into(),
            OpCode::DUP3.into(),
            self.opcode.into(),
            OpCode::ISZERO.into(),
        ]);
        let skip_push = ops.len();
        ops.extend([
            label(0),
            OpCode::JUMPI.into(),
            Op::push1(1),
            OpCode::SWAP1.into(),
            OpCode::POP.into(),
        ]);
        let skip = encoded_len(&ops);
        ops.extend(
            [
                OpCode::JUMPDEST,
                OpCode::SWAP3,
                OpCode::SWAP2,
                OpCode::POP,
                OpCode::POP,
                OpCode::JUMP,
            ]
            .map(Op::new),
        );
        ops[0] = label(encoded_len(&ops));
        ops[skip_push] = label(skip);
        ops.push(OpCode::JUMPDEST.into());

        let constants = self.constants();
        ops.extend(constants.iter().map(|value| Op::push32(*value)));

        for (slot, &(a, b)) in self.calls().iter().enumerate() {
            let start = encoded_len(&ops);
            let b_op = operand(b, 0, constants.len())?;
            let a_op = match (a, b) {
                (Lit(x), Lit(y)) if x == y => OpCode::DUP1.into(),
                _ => operand(a, 1, constants.len())?,
            };
            // return label, operands, then `PUSH1 entry JUMP`
            let ret = start + label(0).width() + b_op.width() + a_op.width() + 3;
            ops.extend([label(ret), b_op, a_op, label(entry), OpCode::JUMP.into()]);
            ops.extend([
                OpCode::JUMPDEST.into(),
                label(slot),
                OpCode::SSTORE.into(),
            ]);
        }

        ops.extend([Op::push1(32), Op::push1(0), OpCode::RETURN.into()]);
        Ok(ops)
    }
}

/// `PUSH1` of a code offset. Offsets past one byte fail on encoding.
fn label(offset: usize) -> Op {
    Op::with_immediate(OpCode::PUSH1, U256::from(offset))
}

/// Pushes `arg`. `pushed` operands are already above the return label.
fn operand(arg: Arg, pushed: usize, constants: usize) -> Result<Op, FillErrorKind> {
    match arg {
        Lit(value) => Ok(Op::push1(value)),
        Var(index) => {
            // constants sit below the return label, the last one directly under it
            let depth = constants
                .checked_sub(index as usize + 1)
                .map(|below| below + 2 + pushed)
                .and_then(|depth| u8::try_from(depth).ok());
            depth
                .and_then(opcode::dup)
                .map(Op::new)
                .ok_or_else(|| AssemblyError::UnknownMnemonic(format!("minus{}", index + 1)).into())
        }
    }
}

/// Recorded compiler output of every comparison source.
pub fn pinned_outputs() -> Vec<(String, Bytes)> {
    ALL.iter()
        .map(|comparison| (comparison.source(), comparison.compiled()))
        .collect()
}

/// Filler for one comparison.
#[derive(Clone)]
pub struct ComparisonFiller {
    id: String,
    comparison: Comparison,
    compiler: Arc<dyn Compiler>,
}

impl ComparisonFiller {
    /// Creates the filler of `comparison`, compiling its source with `compiler`.
    pub fn new(comparison: Comparison, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            id: comparison.filler_id(),
            comparison,
            compiler,
        }
    }

    /// The comparison under test.
    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }
}

impl fmt::Debug for ComparisonFiller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonFiller")
            .field("id", &self.id)
            .field("comparison", &self.comparison)
            .finish_non_exhaustive()
    }
}

impl Filler for ComparisonFiller {
    fn id(&self) -> &str {
        &self.id
    }

    fn forks(&self) -> ForkSelection {
        FORKS
    }

    fn fill(&self, _fork: SpecId) -> Result<Vec<StateTest>, FillErrorKind> {
        let comparison = &self.comparison;
        let code = cross_check(
            self.compiler.as_ref(),
            &comparison.source(),
            &comparison.program()?,
        )?;
        let balance = U256::from(BALANCE);

        let pre = State::from([
            (CONTRACT, Account::from_balance(balance).with_code(code)),
            (TEST_ADDRESS, Account::from_balance(balance)),
        ]);
        let tx = Transaction::builder()
            .ty(TxType::Legacy)
            .chain_id(U256::ZERO)
            .nonce(U256::ZERO)
            .to(CONTRACT)
            .gas_limit(U256::from(500_000))
            .gas_price(U256::from(10))
            .protected(false)
            .build()?;
        let post = ExpectedState::from([(
            CONTRACT,
            ExpectedAccount::new()
                .with_code(comparison.compiled())
                .with_storage(comparison.expected_storage()),
        )]);

        Ok(vec![StateTest::new(Environment::default(), pre, vec![tx], post)])
    }
}

/// Fillers of every comparison, sharing `compiler`.
pub fn fillers(compiler: Arc<dyn Compiler>) -> Vec<ComparisonFiller> {
    ALL.iter()
        .map(|comparison| ComparisonFiller::new(*comparison, compiler.clone()))
        .collect()
}
