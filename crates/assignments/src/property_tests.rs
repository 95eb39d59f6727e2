use proptest::prelude::*;

use crate::{AppRef, IgnoredApps, Registry};

const KEYS: &[char] = &['a', 'b', 'C', 'd'];
const BUNDLES: &[&str] = &["com.one", "com.two", "com.three", "com.four", "com.five"];

#[derive(Debug, Clone)]
enum Op {
    Assign(usize, usize),
    RemoveAssignment(usize),
    RemoveApp(usize, usize),
    RemoveBundle(usize),
    Next(usize),
    AutoAssign,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let k = 0..KEYS.len();
    let b = 0..BUNDLES.len();
    prop_oneof![
        4 => (k.clone(), b.clone()).prop_map(|(k, b)| Op::Assign(k, b)),
        1 => k.clone().prop_map(Op::RemoveAssignment),
        2 => (k.clone(), b.clone()).prop_map(|(k, b)| Op::RemoveApp(k, b)),
        1 => b.prop_map(Op::RemoveBundle),
        3 => k.prop_map(Op::Next),
        1 => Just(Op::AutoAssign),
    ]
}

fn apply(reg: &mut Registry, op: &Op) {
    match *op {
        Op::Assign(k, b) => {
            reg.assign(KEYS[k], BUNDLES[b], BUNDLES[b]);
        }
        Op::RemoveAssignment(k) => {
            reg.remove_assignment(KEYS[k]);
        }
        Op::RemoveApp(k, b) => {
            reg.remove_app(BUNDLES[b], KEYS[k]);
        }
        Op::RemoveBundle(b) => {
            reg.remove_bundle(BUNDLES[b]);
        }
        Op::Next(k) => {
            reg.next_bundle_id(KEYS[k]);
        }
        Op::AutoAssign => {
            let candidates: Vec<AppRef> = BUNDLES
                .iter()
                .map(|b| AppRef::new(*b, b.trim_start_matches("com.")))
                .collect();
            reg.auto_assign(&candidates, &IgnoredApps::new());
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_op(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut reg = Registry::new();
        for op in &ops {
            apply(&mut reg, op);
            prop_assert_eq!(reg.check_invariants(), Ok(()), "after {:?}", op);
        }
    }
}

proptest! {
    #[test]
    fn key_for_agrees_with_lists(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut reg = Registry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        for b in BUNDLES {
            let holders: Vec<char> = reg
                .iter()
                .filter(|(_, apps)| apps.iter().any(|a| a.bundle_id == *b))
                .map(|(k, _)| k)
                .collect();
            match reg.key_for(b) {
                Some(k) => prop_assert_eq!(holders, vec![k]),
                None => prop_assert!(holders.is_empty()),
            }
        }
    }
}

proptest! {
    #[test]
    fn cycle_visits_every_app_once_per_lap(
        ops in prop::collection::vec(op_strategy(), 0..32),
        k in 0..KEYS.len(),
    ) {
        let mut reg = Registry::new();
        for op in &ops {
            apply(&mut reg, op);
        }
        let key = KEYS[k];
        let mut expected = reg.bundle_ids(key);
        let mut lap: Vec<String> = (0..expected.len())
            .filter_map(|_| reg.next_bundle_id(key))
            .collect();
        expected.sort();
        lap.sort();
        prop_assert_eq!(lap, expected);
    }
}
