//! Property-based invariant tests for the observable dictionary.
//!
//! Arbitrary sequences of add / remove / remove-entry / clear are applied to
//! a dictionary and to a plain `Vec` model. After every step:
//!
//! 1. Entries match the model, in insertion order.
//! 2. `keys()[i]` and `values()[i]` belong to the same entry.
//! 3. `count() == keys().len() == values().len()`.
//! 4. Keys are unique.
//! 5. The count signal fired once per change notification, with the count
//!    the dictionary had at that moment.
//! 6. A read-only view observed exactly the source's notifications.
//! 7. `version()` equals the number of change notifications.
//! 8. No panics on arbitrary operation sequences.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use obsdict::{Change, ObservableDictionary, ObservableMapping};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Add(u8, u8),
    Remove(u8),
    RemoveEntry(u8, u8),
    Clear,
}

// Small key and value domains so overwrites, misses and duplicate values
// are common.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..8, 0u8..3).prop_map(|(k, v)| Op::Add(k, v)),
        3 => (0u8..8).prop_map(Op::Remove),
        2 => (0u8..8, 0u8..3).prop_map(|(k, v)| Op::RemoveEntry(k, v)),
        1 => Just(Op::Clear),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 0..=max_len)
}

// ── Model ─────────────────────────────────────────────────────────────────

fn apply_model(model: &mut Vec<(u8, u8)>, op: &Op) {
    match *op {
        Op::Add(k, v) => {
            model.retain(|(mk, _)| *mk != k);
            model.push((k, v));
        }
        Op::Remove(k) => model.retain(|(mk, _)| *mk != k),
        Op::RemoveEntry(k, v) => model.retain(|entry| *entry != (k, v)),
        Op::Clear => model.clear(),
    }
}

fn apply(dict: &ObservableDictionary<u8, u8>, op: &Op) {
    match *op {
        Op::Add(k, v) => dict.add(k, v),
        Op::Remove(k) => {
            dict.remove(&k);
        }
        Op::RemoveEntry(k, v) => {
            dict.remove_entry(&k, &v);
        }
        Op::Clear => dict.clear(),
    }
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn matches_model_and_stays_aligned(ops in ops_strategy(64)) {
        let dict = ObservableDictionary::new();
        let mut model = Vec::new();

        for op in &ops {
            apply(&dict, op);
            apply_model(&mut model, op);

            prop_assert_eq!(dict.entries(), model.clone());

            let keys = dict.keys().to_vec();
            let values = dict.values().to_vec();
            prop_assert_eq!(keys.len(), dict.count());
            prop_assert_eq!(values.len(), dict.count());
            for (k, v) in keys.iter().zip(&values) {
                prop_assert_eq!(dict.get(k), Ok(*v));
            }

            let unique: HashSet<u8> = keys.iter().copied().collect();
            prop_assert_eq!(unique.len(), keys.len());
        }
    }

    #[test]
    fn count_signal_once_per_change(ops in ops_strategy(64)) {
        let dict = ObservableDictionary::<u8, u8>::new();
        let probe = dict.clone();
        let changes = Rc::new(RefCell::new(0usize));
        let counts = Rc::new(RefCell::new(Vec::new()));

        let changes_clone = Rc::clone(&changes);
        let _c = dict.subscribe(move |_| *changes_clone.borrow_mut() += 1);
        let counts_clone = Rc::clone(&counts);
        let _n = dict.subscribe_count(move |n| {
            counts_clone.borrow_mut().push((n, probe.count()));
        });

        for op in &ops {
            apply(&dict, op);
        }

        let counts = counts.borrow();
        prop_assert_eq!(counts.len(), *changes.borrow());
        for (signalled, actual) in counts.iter() {
            prop_assert_eq!(signalled, actual);
        }
        prop_assert_eq!(dict.version(), *changes.borrow() as u64);
    }

    #[test]
    fn view_relays_every_notification(ops in ops_strategy(48)) {
        let dict = ObservableDictionary::<u8, u8>::new();
        let view = dict.read_only();
        let source_log: Rc<RefCell<Vec<Change<u8, u8>>>> = Rc::new(RefCell::new(Vec::new()));
        let view_log: Rc<RefCell<Vec<Change<u8, u8>>>> = Rc::new(RefCell::new(Vec::new()));

        let source_clone = Rc::clone(&source_log);
        let _s = dict.subscribe(move |c| source_clone.borrow_mut().push(c.clone()));
        let view_clone = Rc::clone(&view_log);
        let _v = view.subscribe(move |c| view_clone.borrow_mut().push(c.clone()));

        for op in &ops {
            apply(&dict, op);
        }

        let view_log = view_log.borrow();
        let source_log = source_log.borrow();
        prop_assert_eq!(&*view_log, &*source_log);
        prop_assert_eq!(view.entries(), dict.entries());
    }

    #[test]
    fn removal_hint_matches_prior_position(ops in ops_strategy(48), target in 0u8..8) {
        let dict = ObservableDictionary::<u8, u8>::new();
        for op in &ops {
            apply(&dict, op);
        }

        let expected = dict.keys().position(&target);
        let hint = Rc::new(RefCell::new(None));
        let hint_clone = Rc::clone(&hint);
        let _s = dict.subscribe(move |c| *hint_clone.borrow_mut() = c.index());

        let removed = dict.remove(&target);
        prop_assert_eq!(removed, expected.is_some());
        prop_assert_eq!(*hint.borrow(), expected);
    }
}
