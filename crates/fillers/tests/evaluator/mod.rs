//! Reference stack machine for the instructions the shipped fillers use.
//!
//! Only good enough to check expected storage: no gas, no memory, no value
//! transfers, and any instruction outside the subset panics.

use bytecode::{disassemble, opcode::*};
use primitives::U256;
use state::Storage;
use std::collections::BTreeMap;

const SIGN: U256 = U256::from_limbs([0, 0, 0, 1 << 63]);

/// Runs `code` on empty storage and returns the storage it leaves.
pub fn run(code: &[u8]) -> Storage {
    run_with_stack(code).0
}

/// Runs `code` and also returns the final stack, top last.
pub fn run_with_stack(code: &[u8]) -> (Storage, Vec<U256>) {
    let ops = disassemble(code).expect("valid code");
    let index: BTreeMap<usize, usize> = ops
        .iter()
        .enumerate()
        .map(|(i, (offset, _))| (*offset, i))
        .collect();

    let mut stack: Vec<U256> = Vec::new();
    let mut storage = Storage::new();
    let mut pc = 0;

    let jump = |dest: U256| -> usize {
        let dest = dest.to::<usize>();
        let target = index[&dest];
        assert_eq!(ops[target].1.opcode().get(), JUMPDEST, "bad jump to {dest:#x}");
        target
    };

    while let Some((_, op)) = ops.get(pc) {
        pc += 1;
        let byte = op.opcode().get();
        match byte {
            STOP => break,
            RETURN => {
                stack.truncate(stack.len() - 2);
                break;
            }
            JUMPDEST => {}
            POP => {
                stack.pop().expect("stack underflow");
            }
            JUMP => {
                let dest = stack.pop().expect("stack underflow");
                pc = jump(dest);
            }
            JUMPI => {
                let dest = stack.pop().expect("stack underflow");
                let condition = stack.pop().expect("stack underflow");
                if !condition.is_zero() {
                    pc = jump(dest);
                }
            }
            ISZERO => {
                let a = stack.pop().expect("stack underflow");
                stack.push(flag(a.is_zero()));
            }
            LT | GT | SLT | SGT => {
                let a = stack.pop().expect("stack underflow");
                let b = stack.pop().expect("stack underflow");
                let (a, b) = if matches!(byte, SLT | SGT) {
                    (a ^ SIGN, b ^ SIGN)
                } else {
                    (a, b)
                };
                let holds = if matches!(byte, LT | SLT) { a < b } else { a > b };
                stack.push(flag(holds));
            }
            SSTORE => {
                let key = stack.pop().expect("stack underflow");
                let value = stack.pop().expect("stack underflow");
                storage.insert(key, value);
            }
            DUP1..=DUP16 => {
                let n = usize::from(byte - DUP1 + 1);
                stack.push(stack[stack.len() - n]);
            }
            SWAP1..=SWAP16 => {
                let n = usize::from(byte - SWAP1 + 1);
                let top = stack.len() - 1;
                stack.swap(top, top - n);
            }
            _ if op.opcode().is_push() => stack.push(op.immediate().expect("push operand")),
            _ => panic!("unsupported instruction {op}"),
        }
    }
    (storage, stack)
}

fn flag(value: bool) -> U256 {
    if value {
        U256::from(1)
    } else {
        U256::ZERO
    }
}
