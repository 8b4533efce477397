use aa_tree::{AATreeList, Error};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

// ─── Operations enum for driving randomized tests ────────────────────────────

/// Positions are carried as raw seeds and reduced modulo the live length at replay
/// time, so most operations land in range no matter how the list has evolved.
#[derive(Debug, Clone)]
enum ListOp {
    Insert(usize, i64),
    PushBack(i64),
    Remove(usize),
    Get(usize),
    Set(usize, i64),
}

fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        4 => (any::<usize>(), any::<i64>()).prop_map(|(i, v)| ListOp::Insert(i, v)),
        2 => any::<i64>().prop_map(ListOp::PushBack),
        3 => any::<usize>().prop_map(ListOp::Remove),
        2 => any::<usize>().prop_map(ListOp::Get),
        1 => (any::<usize>(), any::<i64>()).prop_map(|(i, v)| ListOp::Set(i, v)),
    ]
}

// ─── Model-based equivalence with Vec ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of positional operations on both AATreeList and a Vec
    /// reference model and asserts identical results at every step.
    #[test]
    fn list_ops_match_vec(ops in proptest::collection::vec(list_op_strategy(), TEST_SIZE)) {
        let mut list: AATreeList<i64> = AATreeList::new();
        let mut model: Vec<i64> = Vec::new();

        for op in &ops {
            match *op {
                ListOp::Insert(seed, value) => {
                    let index = seed % (model.len() + 1);
                    prop_assert_eq!(list.insert(index, value), Ok(()));
                    model.insert(index, value);
                }
                ListOp::PushBack(value) => {
                    list.push_back(value);
                    model.push(value);
                }
                ListOp::Remove(seed) => {
                    if model.is_empty() {
                        prop_assert_eq!(list.remove(0), Err(Error::OutOfRange { index: 0, len: 0 }));
                    } else {
                        let index = seed % model.len();
                        prop_assert_eq!(list.remove(index), Ok(model.remove(index)));
                    }
                }
                ListOp::Get(seed) => {
                    if model.is_empty() {
                        prop_assert_eq!(list.get(0), Err(Error::OutOfRange { index: 0, len: 0 }));
                    } else {
                        let index = seed % model.len();
                        prop_assert_eq!(list.get(index), Ok(&model[index]));
                    }
                }
                ListOp::Set(seed, value) => {
                    if !model.is_empty() {
                        let index = seed % model.len();
                        *list.get_mut(index).unwrap() = value;
                        model[index] = value;
                    }
                }
            }
            prop_assert_eq!(list.len(), model.len());
        }

        // Full in-order sweep at the end.
        prop_assert!(list.iter().eq(model.iter()));
    }

    /// Out-of-range calls fail with `OutOfRange` and leave the list observably
    /// identical.
    #[test]
    fn out_of_range_leaves_the_list_unchanged(
        values in proptest::collection::vec(any::<i64>(), 0..200),
        beyond in 0usize..100,
    ) {
        let mut list: AATreeList<i64> = values.iter().copied().collect();
        let len = list.len();
        let bad = len + beyond;

        prop_assert_eq!(list.get(bad), Err(Error::OutOfRange { index: bad, len }));
        prop_assert_eq!(list.remove(bad), Err(Error::OutOfRange { index: bad, len }));
        prop_assert_eq!(
            list.insert(bad + 1, 0),
            Err(Error::OutOfRange { index: bad + 1, len })
        );

        prop_assert_eq!(list.len(), len);
        prop_assert!(list.iter().eq(values.iter()));
    }

    /// Removing every element one at a time, in a seed-shuffled order, ends with an
    /// empty list; `get` agrees with the model before every removal.
    #[test]
    fn drain_to_empty(values in proptest::collection::vec(any::<i64>(), 1..500), seed in any::<u64>()) {
        let mut list: AATreeList<i64> = values.iter().copied().collect();
        let mut model = values;
        let mut rng = seed;

        while !model.is_empty() {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            let index = (rng >> 33) as usize % model.len();
            prop_assert_eq!(list.get(index), Ok(&model[index]));
            prop_assert_eq!(list.remove(index), Ok(model.remove(index)));
        }
        prop_assert_eq!(list.len(), 0);
        prop_assert!(list.is_empty());
    }
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn insert_at_an_occupied_rank_displaces_rightward() {
    let mut seq = AATreeList::new();
    seq.insert(0, "x").unwrap();
    seq.insert(1, "y").unwrap();
    seq.insert(1, "z").unwrap();

    assert_eq!(seq.get(0), Ok(&"x"));
    assert_eq!(seq.get(1), Ok(&"z"));
    assert_eq!(seq.get(2), Ok(&"y"));
}

#[test]
fn remove_middle_then_reindex() {
    let mut seq = AATreeList::new();
    seq.insert(0, "x").unwrap();
    seq.insert(1, "y").unwrap();
    seq.insert(1, "z").unwrap();

    assert_eq!(seq.remove(1), Ok("z"));
    assert_eq!(seq.get(0), Ok(&"x"));
    assert_eq!(seq.get(1), Ok(&"y"));
    assert_eq!(seq.len(), 2);
}

#[test]
fn get_past_the_end_is_out_of_range() {
    let mut seq = AATreeList::new();
    seq.push_back(1);
    seq.push_back(2);

    assert_eq!(seq.get(5), Err(Error::OutOfRange { index: 5, len: 2 }));
}

#[test]
fn iteration_is_lazy_and_in_index_order() {
    let list: AATreeList<usize> = (0..1000).collect();

    let mut iter = list.iter();
    assert_eq!(iter.len(), 1000);
    assert_eq!(iter.next(), Some(&0));
    assert!(iter.copied().eq(1..1000));

    // Restart by creating a fresh iterator.
    assert!(list.iter().copied().eq(0..1000));
}
