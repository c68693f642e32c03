mod evaluator;

use bytecode::{assemble, Op, OpCode};
use statefill_fillers::{
    all_fillers, fill, fill_all,
    vm::{comparison_operators, swap},
    FillConfig, Filler,
};
use primitives::{ForkRegistry, SpecId::*, U256};
use rstest::rstest;
use state::Account;
use statetest_types::TestSuite;

#[test]
fn lt_of_literals() {
    let code = assemble(&[Op::push1(1), Op::push1(0), OpCode::LT.into()]).unwrap();
    assert_eq!(code.len(), 5);
    let (_, stack) = evaluator::run_with_stack(&code);
    assert_eq!(stack, [U256::from(1)]);
}

#[rstest]
#[case::lt(comparison_operators::LT)]
#[case::gt(comparison_operators::GT)]
#[case::slt(comparison_operators::SLT)]
#[case::sgt(comparison_operators::SGT)]
fn comparison_storage_matches_execution(#[case] comparison: comparison_operators::Comparison) {
    let storage = evaluator::run(&comparison.compiled());
    assert_eq!(storage, comparison.expected_storage());
}

#[test]
fn swap_storage_matches_execution() {
    for n in 1..=16 {
        let code = assemble(&swap::program(n).unwrap()).unwrap();
        assert_eq!(evaluator::run(&code), swap::expected_storage(n), "SWAP{n}");
    }
}

#[test]
fn post_state_holds_after_execution() {
    let registry = ForkRegistry::mainnet();
    for filler in all_fillers() {
        let cases = fill(filler.as_ref(), registry, &FillConfig::default()).unwrap();
        for case in &cases {
            for (address, expected) in case.post() {
                let pre = &case.pre()[address];
                let actual = Account {
                    storage: evaluator::run(&pre.code),
                    ..pre.clone()
                };
                let discrepancies = expected.diff(&actual);
                assert!(discrepancies.is_empty(), "{} {address}: {discrepancies:?}", case.name());
            }
        }
    }
}

#[rstest]
#[case::lt("vm/comparison_operators/test_lt", &[BERLIN, LONDON, MERGE])]
#[case::sgt("vm/comparison_operators/test_sgt", &[BERLIN, LONDON, MERGE])]
#[case::swap("vm/swap/test_swap", &[ISTANBUL, BERLIN, LONDON, MERGE])]
fn forks_per_filler(#[case] id: &str, #[case] forks: &[primitives::SpecId]) {
    let fillers = all_fillers();
    let filler = fillers.iter().find(|filler| filler.id() == id).unwrap();
    let cases = fill(filler.as_ref(), ForkRegistry::mainnet(), &FillConfig::default()).unwrap();
    let filled: Vec<_> = cases.iter().map(|case| case.fork()).collect();
    assert_eq!(filled, forks);
}

#[test]
fn suites_are_deterministic() {
    let fillers = all_fillers();
    let run = || {
        fill_all(
            fillers.iter().map(|filler| filler.as_ref() as &dyn Filler),
            ForkRegistry::mainnet(),
            &FillConfig::default(),
        )
        .unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first.len(), 5);
    for ((id, a), (_, b)) in first.iter().zip(&second) {
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap(), "{id}");
    }
}

#[test]
fn fixture_json() {
    let fillers = all_fillers();
    let suites = fill_all(
        fillers.iter().map(|filler| filler.as_ref() as &dyn Filler),
        ForkRegistry::mainnet(),
        &FillConfig {
            filter: Some("test_lt".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(suites.len(), 1);
    let (id, suite): &(String, TestSuite) = &suites[0];
    assert_eq!(id, "vm/comparison_operators/test_lt");

    let json: serde_json::Value = serde_json::from_str(&suite.to_json().unwrap()).unwrap();
    let berlin = &json["vm/comparison_operators/test_lt_0[fork_Berlin]"];
    let london = &json["vm/comparison_operators/test_lt_0[fork_London]"];
    let merge = &json["vm/comparison_operators/test_lt_0[fork_Merge]"];
    assert_eq!(berlin["fork"], "Berlin");
    assert!(berlin["env"].get("currentBaseFee").is_none());
    assert_eq!(london["env"]["currentBaseFee"], "0x7");
    assert_eq!(
        merge["env"]["currentRandom"],
        "0x0000000000000000000000000000000000000000000000000000000000000000"
    );

    let contract = "0x1000000000000000000000000000000000000000";
    assert_eq!(berlin["pre"][contract]["balance"], "0xba1a9ce0ba1a9ce");
    assert_eq!(berlin["post"][contract]["storage"]["0x5"], "0xff");
    assert_eq!(berlin["transactions"][0]["gasLimit"], "0x7a120");
    assert_eq!(berlin["transactions"][0]["chainId"], "0x0");
}
