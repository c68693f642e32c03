//! `SWAP1` through `SWAP16`.
//!
//! Sixteen contracts push `0x00..=0x10`, apply one `SWAPn` each, and store the whole
//! stack into slots `0..=16`. After `SWAPn` slot `0` holds the value that was
//! `n` deep and slot `n` holds `0x10`.

use crate::{FillErrorKind, FnFiller};
use bytecode::{assemble_for, opcode, AssemblyError, Op, OpCode};
use primitives::{
    Address, Bytes, ForkRange, ForkSelection, SpecId, TEST_ADDRESS, U256,
};
use state::{Account, ExpectedAccount, ExpectedState, State, Storage};
use statetest_types::{Environment, StateTest, Transaction, TxType};

/// Filler exercising every `SWAPn`.
pub const TEST_SWAP: FnFiller = FnFiller::new(
    "vm/swap/test_swap",
    ForkSelection::Range(ForkRange::new(SpecId::ISTANBUL, SpecId::SHANGHAI)),
    test_swap,
);

/// Number of `SWAPn` variants.
const SWAPS: u8 = 16;

/// Values pushed before the swap, `0x00` at the bottom.
const STACK_DEPTH: u8 = SWAPS + 1;

/// Contract using `SWAP{n}`, `n` in `1..=16`, lives at `0x100 + n - 1`.
pub fn contract(n: u8) -> Address {
    Address::left_padding_from(&(0x100u16 + u16::from(n) - 1).to_be_bytes())
}

/// Code of the contract using `SWAP{n}`.
pub fn program(n: u8) -> Result<Vec<Op>, FillErrorKind> {
    let swap = opcode::swap(n).ok_or_else(|| AssemblyError::UnknownMnemonic(format!("SWAP{n}")))?;
    let mut ops: Vec<Op> = (0..STACK_DEPTH).map(Op::push1).collect();
    ops.push(swap.into());
    for slot in 0..STACK_DEPTH {
        ops.extend([Op::push1(slot), OpCode::SSTORE.into()]);
    }
    Ok(ops)
}

/// Storage left by the contract using `SWAP{n}`. Zero slots are listed too.
pub fn expected_storage(n: u8) -> Storage {
    // top of the stack first, which is also the order the slots are written in
    let mut values: Vec<u8> = (0..STACK_DEPTH).rev().collect();
    values.swap(0, usize::from(n));
    values
        .into_iter()
        .enumerate()
        .map(|(slot, value)| (U256::from(slot), U256::from(value)))
        .collect()
}

fn test_swap(fork: SpecId) -> Result<Vec<StateTest>, FillErrorKind> {
    let mut pre = State::from([(
        TEST_ADDRESS,
        Account::from_balance(U256::from(10).pow(U256::from(21))),
    )]);
    let mut txs = Vec::with_capacity(usize::from(SWAPS));
    let mut post = ExpectedState::new();

    for n in 1..=SWAPS {
        let address = contract(n);
        let code: Bytes = assemble_for(&program(n)?, fork)?;
        pre.insert(address, Account::default().with_code(code));
        txs.push(
            Transaction::builder()
                .ty(TxType::Legacy)
                .nonce(U256::from(n - 1))
                .to(address)
                .gas_limit(U256::from(500_000))
                .gas_price(U256::from(10))
                .protected(false)
                .data(Bytes::new())
                .build()?,
        );
        post.insert(address, ExpectedAccount::new().with_storage(expected_storage(n)));
    }

    Ok(vec![StateTest::new(Environment::default(), pre, txs, post)])
}
